// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convoy")]
#[command(about = "Deploy applications to a Marathon-style orchestrator and wait until they are healthy")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to convoy.yml in the working directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which application, environment, and orchestrator a command targets.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Application descriptor (YAML or JSON)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Target environment (selects endpoints and preproduction overlay)
    #[arg(short, long)]
    pub environment: Option<String>,

    /// Orchestrator base URL, overriding the configured endpoints
    #[arg(long)]
    pub endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or update the application and wait until it is healthy
    Deploy {
        #[command(flatten)]
        target: TargetArgs,

        /// Force the update even if a deployment is in progress
        #[arg(long)]
        force: bool,
    },

    /// Restart the application's instances and wait for the restart to finish
    Restart {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Cancel a running deployment
    Cancel {
        /// Deployment id to cancel
        deployment_id: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Stop the deployment without rolling back
        #[arg(long)]
        force: bool,
    },

    /// List stored versions of an application that is not deployed
    Versions {
        #[command(flatten)]
        target: TargetArgs,
    },
}
