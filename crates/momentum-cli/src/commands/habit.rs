use clap::Subcommand;
use momentum_core::Config;
use serde_json::json;

use super::{open_session, print_json, to_index, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// List habits in execution order
    List,
    /// Append a habit
    Add {
        /// Habit title
        title: String,
    },
    /// Move a habit one place earlier
    Up {
        /// 1-based position
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        position: u64,
    },
    /// Move a habit one place later
    Down {
        /// 1-based position
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        position: u64,
    },
    /// Remove a habit
    Remove {
        /// 1-based position
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        position: u64,
    },
}

pub fn run(action: HabitAction, config: &Config) -> CliResult {
    let mut session = open_session(config)?;

    let outcome = match action {
        HabitAction::List => {
            let habits: Vec<_> = session
                .state()
                .habits()
                .iter()
                .enumerate()
                .map(|(i, habit)| {
                    json!({
                        "position": i + 1,
                        "title": habit.title,
                        "done": habit.done,
                    })
                })
                .collect();
            return print_json(&json!({
                "habits": habits,
                "view": session.build_view(),
            }));
        }
        HabitAction::Add { title } => session.add_habit(&title)?,
        HabitAction::Up { position } => session.move_habit_up(to_index(position))?,
        HabitAction::Down { position } => session.move_habit_down(to_index(position))?,
        HabitAction::Remove { position } => session.remove_habit(to_index(position))?,
    };
    print_json(&outcome)
}
