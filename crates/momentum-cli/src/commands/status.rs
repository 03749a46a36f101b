use momentum_core::Config;

use super::{open_session, print_json, CliResult};

pub fn run(config: &Config) -> CliResult {
    let session = open_session(config)?;
    print_json(&session.snapshot())
}
