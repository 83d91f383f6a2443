// ABOUTME: Deployment lifecycle controller.
// ABOUTME: Orchestration operations plus the completion and health polling loops.

mod deployment;
mod error;
mod health;
mod state;
mod timeouts;
mod wait;

pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind};
pub use state::{HealthOutcome, WaitOutcome};
pub use timeouts::Timeouts;
