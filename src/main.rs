// ABOUTME: Entry point for the convoy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use convoy::config::Config;
use convoy::error::Result;
use convoy::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.quiet || cli.json {
        EnvFilter::new("warn")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mode = OutputMode::from_flags(cli.quiet, cli.json);

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&env::current_dir()?)?,
    };
    let output = Output::new(mode);

    match cli.command {
        Commands::Deploy { target, force } => {
            commands::deploy(&config, &target, force, output).await
        }
        Commands::Restart { target } => commands::restart(&config, &target, output).await,
        Commands::Cancel {
            deployment_id,
            target,
            force,
        } => commands::cancel(&config, &target, &deployment_id, force, output).await,
        Commands::Versions { target } => commands::versions(&config, &target, output).await,
    }
}
