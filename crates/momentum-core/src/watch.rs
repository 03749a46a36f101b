//! Expiry watcher.
//!
//! Two wake-up sources feed the same [`Session::check_expiry`] call:
//! - a periodic poll, which also covers sleep/suspend gaps
//! - a one-shot sleep until the lock deadline, recomputed every iteration
//!
//! With `reload_from_store` the record is re-read before every decision, so
//! a watcher running beside short-lived CLI invocations sees their writes.
//!
//! The deadline sleep is measured against the tokio timer while the lock is
//! measured against the session clock; if they disagree the check is simply
//! rejected and the loop sleeps again.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::error::Result;
use crate::events::Event;
use crate::session::{Outcome, Session};
use crate::storage::{KvStore, WatchConfig};

/// Run until `shutdown` resolves, calling `on_event` for every lock reset.
///
/// Returns the number of resets applied.
///
/// # Errors
/// Stops at the first storage failure while persisting a reset.
pub async fn watch_expiry<S, C, F, E>(
    session: &mut Session<S, C>,
    config: &WatchConfig,
    shutdown: F,
    mut on_event: E,
) -> Result<usize>
where
    S: KvStore,
    C: Clock,
    F: Future<Output = ()>,
    E: FnMut(&Event),
{
    let mut poll = tokio::time::interval(config.poll_interval());
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut resets = 0;
    loop {
        if config.reload_from_store {
            session.reload();
        }
        let deadline = if config.deadline_wakeup {
            session.remaining_lock_ms()
        } else {
            None
        };
        let wakeup = async move {
            match deadline {
                Some(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = poll.tick() => trace!("expiry poll"),
            _ = wakeup => debug!("lock deadline reached"),
            _ = &mut shutdown => break,
        }

        if config.reload_from_store {
            session.reload();
        }
        if let Outcome::Applied(event) = session.check_expiry()? {
            resets += 1;
            on_event(&event);
        }
    }

    debug!(resets, "expiry watcher stopped");
    Ok(resets)
}
