//! Worklink — reconcile time entries with issue-tracker worklogs.
//!
//! # Usage
//!
//! ```text
//! worklink diff --snapshot <file> [--settings <file>] [--issue <KEY>] [--day <YYYY-MM-DD>] [--json]
//! worklink status --snapshot <file> [--settings <file>] [--json]
//! worklink settings list [--snapshot <file>] [--settings <file>]
//! worklink settings add <KEY> [--time-tracker-project <NAME>] [--billable] [--skip-issue-sync]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, settings::SettingsCommand, status::StatusArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "worklink",
    version,
    about = "Reconcile time-tracking entries with issue-tracker worklogs",
    long_about = None,
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the actions and messages for every pairing in a snapshot.
    Diff(DiffArgs),

    /// Summarize differences per day.
    Status(StatusArgs),

    /// Inspect and edit project policies.
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Diff(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Settings { command } => commands::settings::run(command),
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
