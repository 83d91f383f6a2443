// ABOUTME: Deployment-completion wait loops.
// ABOUTME: Poll the active deployments list until the awaited records disappear or the deadline passes.

use crate::gateway::OrchestratorGateway;
use crate::observer::WaitTarget;
use crate::query;

use super::Deployment;
use super::error::DeployError;
use super::state::{CompletionState, WaitOutcome};
use super::timeouts::next_sleep;

impl<G: OrchestratorGateway> Deployment<'_, G> {
    /// Wait until the deployment stored by `create`/`update` is no longer
    /// listed as active.
    ///
    /// With no stored id nothing can match, so the first poll completes
    /// without having observed a deployment.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::DeploymentTimeout` when the deadline passes first.
    pub async fn wait_for_deployment_id(&self) -> Result<WaitOutcome, DeployError> {
        let target = match &self.deployment_id {
            Some(id) => WaitTarget::Deployment(id.clone()),
            None => WaitTarget::Unassigned,
        };
        self.wait_for(target).await
    }

    /// Wait until no active deployment affects this application.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::DeploymentTimeout` when the deadline passes first.
    pub async fn wait_for_application(&self) -> Result<WaitOutcome, DeployError> {
        self.wait_for(WaitTarget::Application(self.app.id().clone()))
            .await
    }

    async fn wait_for(&self, target: WaitTarget) -> Result<WaitOutcome, DeployError> {
        let start = self.clock.now();
        let mut state = CompletionState::NotStarted;

        loop {
            state = match state {
                CompletionState::NotStarted => self.poll_completion(&target, start, false).await?,
                CompletionState::Polling { observed } => {
                    self.poll_completion(&target, start, observed).await?
                }
                CompletionState::Completed { observed, elapsed } => {
                    if observed {
                        self.observer.deployment_finished(&target, elapsed);
                    }
                    return Ok(WaitOutcome { observed, elapsed });
                }
                CompletionState::TimedOut { elapsed, running } => {
                    return Err(DeployError::DeploymentTimeout {
                        target,
                        elapsed,
                        running,
                    });
                }
            };
        }
    }

    /// One iteration: fetch fresh state, then either finish, time out, or
    /// report progress and sleep.
    async fn poll_completion(
        &self,
        target: &WaitTarget,
        start: std::time::Instant,
        observed: bool,
    ) -> Result<CompletionState, DeployError> {
        let active = query::fetch_active_deployments(&self.gateway, &self.endpoint).await?;
        let running = match target {
            WaitTarget::Deployment(id) => query::filter_by_deployment_id(&active, id),
            WaitTarget::Application(app) => query::filter_by_affected_app(&active, app),
            WaitTarget::Unassigned => Vec::new(),
        };
        let elapsed = self.clock.elapsed_since(start);

        if running.is_empty() {
            return Ok(CompletionState::Completed { observed, elapsed });
        }

        if elapsed >= self.timeouts.deployment {
            return Ok(CompletionState::TimedOut {
                elapsed,
                running: running.len(),
            });
        }

        self.observer.deployment_progress(target, elapsed);
        for record in &running {
            self.observer.deployment_detail(record);
        }

        self.clock
            .sleep(next_sleep(
                self.timeouts.deployment_recheck,
                self.timeouts.deployment,
                elapsed,
            ))
            .await;

        Ok(CompletionState::Polling { observed: true })
    }
}
