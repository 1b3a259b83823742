//! probekit CLI: replay recorded input streams through the trackers.
//!
//! Usage:
//!   probekit replay <EVENTS>     Replay an event file and show each screen
//!   probekit validate <EVENTS>   Check an event file for problems
//!   probekit config              Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use probekit_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "probekit",
    about = "Input-event diagnostics for verifying automation tooling",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded event stream through the tap, swipe, and key trackers
    Replay {
        /// Path to the JSONL event file
        path: PathBuf,

        /// Write every emitted entry to this JSONL file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the final tracker state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a recorded event stream
    Validate {
        /// Path to the JSONL event file
        path: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Write the defaults to the standard config location
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    probekit_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Replay { path, output, json } => {
            commands::replay::run(path, output, json, &config)
        }
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Config { init } => commands::config::run(init, &config),
    }
}
