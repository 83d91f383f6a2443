// ABOUTME: Notification sink for deployment progress and outcomes.
// ABOUTME: TracingObserver forwards every event to the tracing macros.

use std::time::Duration;

use crate::query::ActiveDeployment;
use crate::types::{AppId, DeploymentId, TaskId};

/// What a wait loop is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitTarget {
    Deployment(DeploymentId),
    Application(AppId),
    /// A deployment id was expected but none has been recorded.
    Unassigned,
}

impl std::fmt::Display for WaitTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitTarget::Deployment(id) => write!(f, "deployment {id}"),
            WaitTarget::Application(app) => write!(f, "application {app}"),
            WaitTarget::Unassigned => write!(f, "unassigned deployment"),
        }
    }
}

/// Receives every notification the deployment controller emits.
///
/// Injected at construction so embedders and tests can observe progress
/// without a process-wide logger.
pub trait DeployObserver: Send + Sync {
    /// A matching deployment is still running.
    fn deployment_progress(&self, target: &WaitTarget, elapsed: Duration);

    /// Per-record detail for a running deployment.
    fn deployment_detail(&self, record: &ActiveDeployment);

    /// A deployment that was observed running has finished.
    fn deployment_finished(&self, target: &WaitTarget, elapsed: Duration);

    /// Some tasks report failing health checks.
    fn unhealthy_tasks(&self, app: &AppId, unhealthy: &[TaskId], instances: u32);

    /// No task is unhealthy but the healthy count differs from `instances`.
    fn partially_healthy(&self, app: &AppId, healthy: &[TaskId], instances: u32);

    /// The healthy count reached `instances`.
    fn healthy(&self, app: &AppId, healthy: &[TaskId], instances: u32);

    /// The application declares no health checks, so health is not polled.
    fn no_health_checks(&self, app: &AppId);

    /// Free-form message (request URLs, response statuses).
    fn message(&self, level: Level, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Debug,
}

fn join_ids(ids: &[TaskId]) -> String {
    ids.iter().map(TaskId::as_str).collect::<Vec<_>>().join(",")
}

/// Default observer: info for progress and outcomes, debug for detail.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DeployObserver for TracingObserver {
    fn deployment_progress(&self, target: &WaitTarget, elapsed: Duration) {
        tracing::info!(
            %target,
            elapsed_secs = elapsed.as_secs_f64(),
            "Deployment of {} in progress (elapsed time {:.2}s)",
            target,
            elapsed.as_secs_f64()
        );
    }

    fn deployment_detail(&self, record: &ActiveDeployment) {
        tracing::debug!(deployment_id = %record.id, "{}", record.describe());
    }

    fn deployment_finished(&self, target: &WaitTarget, elapsed: Duration) {
        tracing::info!(
            %target,
            elapsed_secs = elapsed.as_secs_f64(),
            "Deployment of {} ended (total time {:.2}s)",
            target,
            elapsed.as_secs_f64()
        );
    }

    fn unhealthy_tasks(&self, app: &AppId, unhealthy: &[TaskId], instances: u32) {
        tracing::info!(
            %app,
            unhealthy = unhealthy.len(),
            instances,
            "{}/{} instances are not healthy => {}",
            unhealthy.len(),
            instances,
            join_ids(unhealthy)
        );
    }

    fn partially_healthy(&self, app: &AppId, healthy: &[TaskId], instances: u32) {
        tracing::info!(
            %app,
            healthy = healthy.len(),
            instances,
            "{}/{} healthy instances seen, retrying",
            healthy.len(),
            instances
        );
    }

    fn healthy(&self, app: &AppId, healthy: &[TaskId], instances: u32) {
        tracing::info!(
            %app,
            healthy = healthy.len(),
            instances,
            "{}/{} instances are healthy => {}",
            healthy.len(),
            instances,
            join_ids(healthy)
        );
    }

    fn no_health_checks(&self, app: &AppId) {
        tracing::info!(
            %app,
            "No health checks defined. Cannot determine application health of {}.",
            app
        );
    }

    fn message(&self, level: Level, text: &str) {
        match level {
            Level::Info => tracing::info!("{text}"),
            Level::Debug => tracing::debug!("{text}"),
        }
    }
}
