//! Development tasks for the monster AI workspace
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{CheckConfig, Simulate};

/// Development tasks for the monster AI workspace
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for the monster AI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a scenario headless and print what the monsters decide
    Simulate(Simulate),

    /// Validate tuning, profiles and scenario files
    CheckConfig(CheckConfig),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for MAZE_AI_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate(cmd) => cmd.execute(),
        Command::CheckConfig(cmd) => cmd.execute(),
    }
}
