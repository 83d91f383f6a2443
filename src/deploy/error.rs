// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers input validation, transport, orchestrator inconsistencies, and wait timeouts.

use std::time::Duration;

use crate::gateway::TransportError;
use crate::observer::WaitTarget;
use crate::types::{AppId, AppIdError, EndpointError};

/// Errors that can occur while driving a deployment.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Bad input, rejected before any network call.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The orchestrator call itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The orchestrator answered with a structurally inconsistent payload.
    #[error("deployment error: {0}")]
    Deployment(String),

    /// The awaited deployment was still running when the deadline passed.
    #[error(
        "timed out waiting for {target} after {secs:.2}s ({running} deployment(s) still running)",
        secs = .elapsed.as_secs_f64()
    )]
    DeploymentTimeout {
        target: WaitTarget,
        elapsed: Duration,
        running: usize,
    },

    /// The application did not reach its healthy instance count in time.
    #[error(
        "timed out waiting for {app} to become healthy after {secs:.2}s \
         ({healthy}/{instances} healthy, {unhealthy} unhealthy)",
        secs = .elapsed.as_secs_f64()
    )]
    HealthCheckTimeout {
        app: AppId,
        elapsed: Duration,
        healthy: usize,
        unhealthy: usize,
        instances: u32,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Validation,
    Transport,
    Deployment,
    DeploymentTimeout,
    HealthCheckTimeout,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Validation(_) => DeployErrorKind::Validation,
            DeployError::Transport(_) => DeployErrorKind::Transport,
            DeployError::Deployment(_) => DeployErrorKind::Deployment,
            DeployError::DeploymentTimeout { .. } => DeployErrorKind::DeploymentTimeout,
            DeployError::HealthCheckTimeout { .. } => DeployErrorKind::HealthCheckTimeout,
        }
    }

    /// Whether this error is one of the two wait deadlines.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self.kind(),
            DeployErrorKind::DeploymentTimeout | DeployErrorKind::HealthCheckTimeout
        )
    }

    /// Elapsed wait time carried by timeout errors.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            DeployError::DeploymentTimeout { elapsed, .. }
            | DeployError::HealthCheckTimeout { elapsed, .. } => Some(*elapsed),
            _ => None,
        }
    }
}

impl From<EndpointError> for DeployError {
    fn from(err: EndpointError) -> Self {
        DeployError::Validation(err.to_string())
    }
}

impl From<AppIdError> for DeployError {
    fn from(err: AppIdError) -> Self {
        DeployError::Validation(err.to_string())
    }
}
