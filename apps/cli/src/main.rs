#![deny(warnings)]

//! Headless CLI for revenue projections, advisor prompts, the mock founder
//! feed and the saved-idea list.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod scenario;

use commands::{Cli, Commands};

fn main() -> Result<()> {
    // Logging setup; stdout stays clean for exports
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!(version = commands::VERSION, "starting CLI");

    match cli.command {
        Commands::Simulate(args) => commands::simulate(args),
        Commands::Prompt(args) => commands::prompt(args),
        Commands::Feed(args) => commands::feed(args),
        Commands::Ideas(args) => commands::ideas(args),
    }
}
