// ABOUTME: Application-wide error types for convoy.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::app::AppError;
use crate::deploy::DeployError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("deploy file is missing required attributes: {}", .0.join(", "))]
    MissingAttributes(Vec<String>),

    #[error("deploy file is missing required env variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("orchestrator rejected {action} with status {status}: {message}")]
    Rejected {
        action: &'static str,
        status: u16,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
