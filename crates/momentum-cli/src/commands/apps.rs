use clap::Subcommand;
use momentum_core::{Config, APP_CATALOG};
use serde_json::json;

use super::{open_session, print_json, CliResult};

#[derive(Subcommand)]
pub enum AppsAction {
    /// List the apps that can be selected
    Catalog,
    /// Show the current selection
    List,
    /// Replace the selection
    Set {
        /// App names from the catalog (case-insensitive)
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Deselect every app
    Clear,
}

pub fn run(action: AppsAction, config: &Config) -> CliResult {
    match action {
        AppsAction::Catalog => print_json(&APP_CATALOG),
        AppsAction::List => {
            let session = open_session(config)?;
            let apps = session.locked_apps();
            print_json(&json!({
                "apps": apps.names(),
                "summary": apps.summary(),
            }))
        }
        AppsAction::Set { names } => {
            let mut session = open_session(config)?;
            print_json(&session.set_locked_apps(names)?)
        }
        AppsAction::Clear => {
            let mut session = open_session(config)?;
            print_json(&session.set_locked_apps(Vec::<String>::new())?)
        }
    }
}
