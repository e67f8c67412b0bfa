//! JetMET trigger CLI
//!
//! Runs trigger menus over JSON-lines event files.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;

use commands::run::RunCommand;
use commands::validate::ValidateCommand;

#[derive(Parser)]
#[command(
    name = "jetmet-trigger",
    version,
    about = "Per-event JetMET trigger decisions",
    long_about = "Configure energy-sum producers and kinematic filters from a YAML menu,\n\
                  group them into paths, and run every path over every event.",
    after_help = "EXAMPLES:\n  \
                  # List all module types\n  \
                  jetmet-trigger modules\n\n  \
                  # Check a menu without running it\n  \
                  jetmet-trigger validate config/menus/jetmet.yaml\n\n  \
                  # Run a menu on 8 threads, writing per-event decisions\n  \
                  jetmet-trigger run --menu config/menus/jetmet.yaml --events events.jsonl \\\n    \
                  --threads 8 --output decisions.jsonl"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a menu over an event file
    Run(RunCommand),

    /// Load a menu and report configuration errors
    Validate(ValidateCommand),

    /// List available module types
    Modules,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over the defaults below
    let level = match &cli.command {
        Commands::Modules => Level::WARN,
        _ if cli.verbose => Level::DEBUG,
        _ => Level::INFO,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Run(cmd) => cmd.execute(),
        Commands::Validate(cmd) => cmd.execute(),
        Commands::Modules => commands::modules::list_modules(),
    }
}
