// ABOUTME: States and outcomes of the two polling state machines.
// ABOUTME: Each loop iteration produces the next state; terminal states end the loop.

use std::time::Duration;

use crate::types::TaskId;

/// Deployment-completion wait: `NotStarted -> Polling -> {Completed, TimedOut}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CompletionState {
    NotStarted,
    Polling { observed: bool },
    Completed { observed: bool, elapsed: Duration },
    TimedOut { elapsed: Duration, running: usize },
}

/// Health wait: `Check -> {NoHealthChecks, Polling, Healthy, TimedOut}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HealthState {
    Check,
    Polling,
    NoHealthChecks,
    Healthy { tasks: Vec<TaskId> },
    TimedOut {
        elapsed: Duration,
        healthy: usize,
        unhealthy: usize,
    },
}

/// Result of a completed deployment wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOutcome {
    /// The awaited deployment was seen running at least once.
    pub observed: bool,
    pub elapsed: Duration,
}

/// Result of a successful health wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthOutcome {
    /// The application declares no health checks; nothing was polled.
    NoHealthChecks,
    /// Exactly `instances` tasks reported healthy and none unhealthy.
    Healthy { tasks: Vec<TaskId> },
}
