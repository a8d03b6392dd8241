//! Streaming technical indicator engine CLI.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use barstream_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if let Err(e) = setup_logging(cli.log_level.as_str(), cli.json_logs) {
        eprintln!("Logging already initialised: {}", e);
    }

    // Execute command
    match cli.command {
        Commands::Replay(args) => cli::commands::replay::run(args, &cli.config).await,
        Commands::Indicators => cli::commands::indicators::run().await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
