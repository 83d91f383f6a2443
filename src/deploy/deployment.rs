// ABOUTME: Per-application deployment controller and its orchestration operations.
// ABOUTME: Owns the deployment id assigned by the most recent create or update call.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

use crate::app::ApplicationDescriptor;
use crate::clock::{Clock, SystemClock};
use crate::gateway::{ApiResponse, OrchestratorGateway};
use crate::observer::{DeployObserver, Level, TracingObserver};
use crate::query::{self, paths};
use crate::types::{DeploymentId, Endpoint};

use super::error::DeployError;
use super::timeouts::Timeouts;

/// Drives one application's deployments against one orchestrator endpoint.
///
/// Operations run strictly one at a time. The stored deployment id is
/// overwritten by every `create`/`update`; no history is kept.
pub struct Deployment<'a, G> {
    pub(super) app: &'a ApplicationDescriptor,
    pub(super) endpoint: Endpoint,
    pub(super) gateway: G,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) observer: Arc<dyn DeployObserver>,
    pub(super) timeouts: Timeouts,
    pub(super) deployment_id: Option<DeploymentId>,
}

impl<G> std::fmt::Debug for Deployment<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deployment")
            .field("app", self.app.id())
            .field("endpoint", &self.endpoint)
            .field("deployment_id", &self.deployment_id)
            .finish()
    }
}

impl<'a, G: OrchestratorGateway> Deployment<'a, G> {
    /// Create a controller for `app` against the orchestrator at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Validation` if the endpoint is not a valid
    /// http URL.
    pub fn new(
        endpoint: &str,
        app: &'a ApplicationDescriptor,
        gateway: G,
    ) -> Result<Self, DeployError> {
        let endpoint = Endpoint::parse(endpoint)?;
        Ok(Self::with_endpoint(endpoint, app, gateway))
    }

    /// Create a controller from an already validated endpoint.
    pub fn with_endpoint(endpoint: Endpoint, app: &'a ApplicationDescriptor, gateway: G) -> Self {
        Self {
            app,
            endpoint,
            gateway,
            clock: Arc::new(SystemClock),
            observer: Arc::new(TracingObserver),
            timeouts: Timeouts::default(),
            deployment_id: None,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn DeployObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn application(&self) -> &ApplicationDescriptor {
        self.app
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Id assigned by the most recent `create` or `update`, if any.
    pub fn deployment_id(&self) -> Option<&DeploymentId> {
        self.deployment_id.as_ref()
    }

    /// Deadline of the deployment-completion waits.
    pub fn timeout(&self) -> Duration {
        self.timeouts.deployment
    }

    /// Deadline of the health wait.
    pub fn healthcheck_timeout(&self) -> Duration {
        self.timeouts.healthy_wait
    }

    /// Submit the descriptor as a new application.
    ///
    /// When the orchestrator accepts the application, the stored deployment
    /// id becomes the newest deployment it lists for the application, or
    /// unset if it lists none. A rejected create clears the stored id.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Transport` if either request fails.
    pub async fn create(&mut self) -> Result<ApiResponse, DeployError> {
        let url = paths::apps_url(&self.endpoint);
        self.observer
            .message(Level::Debug, &format!("Creating app {} {}", self.app.id(), url));
        let response = self.gateway.post(&url, self.app.spec()).await?;

        if !response.is_success() {
            self.deployment_id = None;
            return Ok(response);
        }

        let current = query::fetch_application(&self.gateway, &self.endpoint, self.app.id()).await?;
        self.deployment_id =
            query::application_state(&current)?.and_then(|state| state.latest_deployment_id());

        Ok(response)
    }

    /// Replace the existing application with the descriptor.
    ///
    /// The stored deployment id is taken from the `deploymentId` field of
    /// the response body.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Transport` if the request fails.
    pub async fn update(&mut self, force: bool) -> Result<ApiResponse, DeployError> {
        let url = paths::update_url(&self.endpoint, self.app.id(), force);
        self.observer
            .message(Level::Debug, &format!("Updating app {} {}", self.app.id(), url));
        let response = self.gateway.put(&url, self.app.spec()).await?;

        self.deployment_id = response
            .body
            .get("deploymentId")
            .and_then(Value::as_str)
            .map(DeploymentId::new);

        Ok(response)
    }

    /// Restart the application's running instances in place.
    ///
    /// Does not touch the stored deployment id.
    pub async fn rolling_restart(&self) -> Result<ApiResponse, DeployError> {
        let url = paths::restart_url(&self.endpoint, self.app.id());
        self.observer
            .message(Level::Debug, &format!("Calling orchestrator api with url: {url}"));
        let response = self.gateway.post(&url, &json!({})).await?;

        self.observer.message(
            Level::Info,
            &format!(
                "Restart of {} returned status code: {}",
                self.app.id(),
                response.status
            ),
        );
        self.observer.message(Level::Info, &pretty(&response.body));

        Ok(response)
    }

    /// Ask the orchestrator to cancel `deployment_id` if it is still running.
    ///
    /// Returns `Ok(None)` without issuing a cancel request when the
    /// deployment is not in the active list.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Validation` for an empty id, before any
    /// network call.
    pub async fn cancel(
        &self,
        deployment_id: &str,
        force: bool,
    ) -> Result<Option<ApiResponse>, DeployError> {
        if deployment_id.is_empty() {
            return Err(DeployError::Validation(
                "deployment id must be specified to cancel a deployment".to_string(),
            ));
        }
        let id = DeploymentId::new(deployment_id);

        let active = query::fetch_active_deployments(&self.gateway, &self.endpoint).await?;
        if query::filter_by_deployment_id(&active, &id).is_empty() {
            self.observer.message(
                Level::Debug,
                &format!("Deployment {id} is not running, nothing to cancel"),
            );
            return Ok(None);
        }

        let response = self
            .gateway
            .delete(&paths::cancel_url(&self.endpoint, &id, force))
            .await?;
        self.observer.message(
            Level::Debug,
            &format!(
                "Cancellation response [{}] => {}",
                response.status,
                pretty(&response.body)
            ),
        );

        Ok(Some(response))
    }

    /// Cancel the deployment stored by the last `create`/`update`.
    pub async fn cancel_current(&self, force: bool) -> Result<Option<ApiResponse>, DeployError> {
        let id = self
            .deployment_id
            .as_ref()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default();
        self.cancel(&id, force).await
    }

    /// Whether the orchestrator knows the application (GET returns 200).
    pub async fn application_exists(&self) -> Result<bool, DeployError> {
        let response =
            query::fetch_application(&self.gateway, &self.endpoint, self.app.id()).await?;
        Ok(response.status == 200)
    }

    /// Stored versions of the application, read only while the
    /// application does not exist; empty otherwise.
    pub async fn versions(&self) -> Result<Vec<String>, DeployError> {
        if self.application_exists().await? {
            return Ok(Vec::new());
        }

        let response = self
            .gateway
            .get(&paths::versions_url(&self.endpoint, self.app.id()))
            .await?;

        Ok(response
            .body
            .get("versions")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn pretty(body: &Value) -> String {
    serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
}
