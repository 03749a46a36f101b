use clap::{Parser, Subcommand};
use momentum_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "momentum", version, about = "Momentum habit tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a full session snapshot as JSON
    Status,
    /// Username and momentum streak
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Habit list management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Focus lock control
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Apps to avoid during focus
    Apps {
        #[command(subcommand)]
        action: commands::apps::AppsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Clear expired locks until Ctrl-C, printing each reset
    Watch,
    /// Delete all persisted session data
    Wipe {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let loaded = Config::load();
    let level = match &loaded {
        Ok(config) => config.logging.level.as_str(),
        Err(_) => "warn",
    };
    init_logging(level);
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("falling back to default config: {e}");
        Config::default()
    });

    let result = match cli.command {
        Commands::Status => commands::status::run(&config),
        Commands::Profile { action } => commands::profile::run(action, &config),
        Commands::Habit { action } => commands::habit::run(action, &config),
        Commands::Focus { action } => commands::focus::run(action, &config),
        Commands::Apps { action } => commands::apps::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Watch => commands::watch::run(&config),
        Commands::Wipe { yes } => commands::wipe::run(yes, &config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
