// ABOUTME: Deadlines and recheck intervals for the wait loops.
// ABOUTME: Built from configuration and handed to the controller at construction.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Overall bound for a deployment-completion wait.
    pub deployment: Duration,
    pub deployment_recheck: Duration,
    /// Overall bound for a health wait.
    pub healthy_wait: Duration,
    pub healthy_recheck: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            deployment: Duration::from_secs(300),
            deployment_recheck: Duration::from_secs(3),
            healthy_wait: Duration::from_secs(300),
            healthy_recheck: Duration::from_secs(3),
        }
    }
}

/// Sleep for `interval`, but never past `deadline`.
pub(crate) fn next_sleep(interval: Duration, deadline: Duration, elapsed: Duration) -> Duration {
    interval.min(deadline.saturating_sub(elapsed))
}
