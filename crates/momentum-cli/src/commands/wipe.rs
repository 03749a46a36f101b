use momentum_core::{Config, Database, KvStore};
use tracing::info;

use super::CliResult;

pub fn run(yes: bool, config: &Config) -> CliResult {
    if !yes {
        return Err("refusing to wipe without --yes".into());
    }
    let mut db = Database::open(&config.storage.database_file)?;
    db.clear()?;
    info!(file = %config.storage.database_file, "session data wiped");
    println!("session data wiped");
    Ok(())
}
