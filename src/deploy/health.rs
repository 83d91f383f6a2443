// ABOUTME: Health wait loop.
// ABOUTME: Polls task health until exactly `instances` tasks are healthy and none unhealthy.

use std::time::Instant;

use crate::gateway::OrchestratorGateway;
use crate::query::{self, HealthPartition};

use super::Deployment;
use super::error::DeployError;
use super::state::{HealthOutcome, HealthState};
use super::timeouts::next_sleep;

impl<G: OrchestratorGateway> Deployment<'_, G> {
    /// Wait until the application's healthy task count equals the
    /// descriptor's `instances` with no task reporting unhealthy.
    ///
    /// Returns immediately with `HealthOutcome::NoHealthChecks` when the
    /// orchestrator reports no declared health checks.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Deployment` if the orchestrator returns an
    /// empty application object, and `DeployError::HealthCheckTimeout` when
    /// the deadline passes first.
    pub async fn wait_until_healthy(&self) -> Result<HealthOutcome, DeployError> {
        let start = self.clock.now();
        let mut state = HealthState::Check;

        loop {
            state = match state {
                HealthState::Check | HealthState::Polling => {
                    self.poll_health(start).await?
                }
                HealthState::NoHealthChecks => return Ok(HealthOutcome::NoHealthChecks),
                HealthState::Healthy { tasks } => return Ok(HealthOutcome::Healthy { tasks }),
                HealthState::TimedOut {
                    elapsed,
                    healthy,
                    unhealthy,
                } => {
                    return Err(DeployError::HealthCheckTimeout {
                        app: self.app.id().clone(),
                        elapsed,
                        healthy,
                        unhealthy,
                        instances: self.app.instances(),
                    });
                }
            };
        }
    }

    async fn poll_health(&self, start: Instant) -> Result<HealthState, DeployError> {
        let app = self.app.id();
        let instances = self.app.instances();

        let response = query::fetch_application(&self.gateway, &self.endpoint, app).await?;
        let current = query::application_state(&response)?.ok_or_else(|| {
            DeployError::Deployment(format!(
                "orchestrator returned an empty app json object for {app}"
            ))
        })?;

        if !current.health_checks_defined() {
            self.observer.no_health_checks(app);
            return Ok(HealthState::NoHealthChecks);
        }

        let partition = HealthPartition::from_samples(&current.health_samples());

        // Any unhealthy task means retry; healthy tasks are not counted then.
        if !partition.unhealthy.is_empty() {
            self.observer
                .unhealthy_tasks(app, &partition.unhealthy, instances);
        } else if partition.healthy.len() == instances as usize {
            self.observer.healthy(app, &partition.healthy, instances);
            return Ok(HealthState::Healthy {
                tasks: partition.healthy,
            });
        } else {
            self.observer
                .partially_healthy(app, &partition.healthy, instances);
        }

        let elapsed = self.clock.elapsed_since(start);
        if elapsed >= self.timeouts.healthy_wait {
            return Ok(HealthState::TimedOut {
                elapsed,
                healthy: partition.healthy.len(),
                unhealthy: partition.unhealthy.len(),
            });
        }

        self.clock
            .sleep(next_sleep(
                self.timeouts.healthy_recheck,
                self.timeouts.healthy_wait,
                elapsed,
            ))
            .await;

        Ok(HealthState::Polling)
    }
}
