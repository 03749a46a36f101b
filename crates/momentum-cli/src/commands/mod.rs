pub mod apps;
pub mod config;
pub mod focus;
pub mod habit;
pub mod profile;
pub mod status;
pub mod watch;
pub mod wipe;

use momentum_core::{Config, Database, Session, SystemClock};
use serde::Serialize;
use tracing::debug;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;
pub type CliSession = Session<Database, SystemClock>;

/// Open the configured database and clear a lock that ran out while no
/// process was watching.
pub fn open_session(config: &Config) -> CliResult<CliSession> {
    let db = Database::open(&config.storage.database_file)?;
    let mut session = Session::open(db, SystemClock);
    if let Some(event) = session.boot()? {
        debug!(?event, "cleared elapsed lock on startup");
    }
    Ok(session)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Convert a 1-based position from the command line to a list index.
pub fn to_index(position: u64) -> usize {
    usize::try_from(position.saturating_sub(1)).unwrap_or(usize::MAX)
}
