use clap::Subcommand;
use momentum_core::Config;
use serde_json::json;

use super::{open_session, print_json, CliResult};

#[derive(Subcommand)]
pub enum FocusAction {
    /// Lock the habit list for 12 hours and start at the first habit
    Start,
    /// Mark the current habit done
    Next,
    /// Show progress and the time left on the lock
    Status,
    /// End the session now and advance the momentum streak
    Reset,
}

pub fn run(action: FocusAction, config: &Config) -> CliResult {
    let mut session = open_session(config)?;

    let outcome = match action {
        FocusAction::Start => session.start_focus()?,
        FocusAction::Next => session.complete_current()?,
        FocusAction::Reset => session.force_reset_and_advance_streak()?,
        FocusAction::Status => {
            let locked_apps = if config.display.show_locked_apps {
                session.locked_apps().badge()
            } else {
                None
            };
            return print_json(&json!({
                "mode": session.mode(),
                "progress": session.focus_progress(),
                "dots": session.progress_dots(),
                "remaining": session.remaining_lock_duration().map(|r| r.to_string()),
                "locked_apps": locked_apps,
            }));
        }
    };
    print_json(&outcome)
}
