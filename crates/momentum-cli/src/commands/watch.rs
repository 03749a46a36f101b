use std::future::Future;
use std::io;

use momentum_core::storage::WatchConfig;
use momentum_core::{watch_expiry, Clock, Config, KvStore, Session};
use tracing::info;

use super::{open_session, CliResult};

pub fn run(config: &Config) -> CliResult {
    let mut session = open_session(config)?;
    info!(
        poll_interval_secs = config.watch.poll_interval_secs,
        "watching for lock expiry"
    );
    let resets = watch_until(&mut session, &config.watch, tokio::signal::ctrl_c())?;
    info!(resets, "watcher stopped");
    Ok(())
}

/// Run the watcher until `signal` resolves. A signal that fails to install
/// is an error, not a shutdown.
fn watch_until<S, C, F>(
    session: &mut Session<S, C>,
    config: &WatchConfig,
    signal: F,
) -> CliResult<usize>
where
    S: KvStore,
    C: Clock,
    F: Future<Output = io::Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut signal_result = Ok(());
    let shutdown = async {
        signal_result = signal.await;
    };
    let resets = runtime.block_on(watch_expiry(session, config, shutdown, |event| {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!("failed to encode event: {e}"),
        }
    }))?;

    signal_result.map_err(|e| format!("failed to listen for Ctrl-C: {e}"))?;
    Ok(resets)
}
