use clap::Subcommand;
use momentum_core::Config;
use serde_json::json;

use super::{open_session, print_json, CliResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the username and momentum streak
    Show,
    /// Set the name used to greet you
    SetName {
        /// Display name
        name: String,
    },
}

pub fn run(action: ProfileAction, config: &Config) -> CliResult {
    let mut session = open_session(config)?;

    match action {
        ProfileAction::Show => {
            let state = session.state();
            print_json(&json!({
                "username": state.username(),
                "onboarded": state.is_onboarded(),
                "momentum_streak": state.momentum_streak(),
                "streak_label": session.streak_label(&config.display.streak_placeholder),
            }))
        }
        ProfileAction::SetName { name } => print_json(&session.set_username(&name)?),
    }
}
