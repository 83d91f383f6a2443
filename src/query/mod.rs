// ABOUTME: Read-only orchestrator queries consumed by the deployment controller.
// ABOUTME: Fetches one application or the active deployments list and filters the latter.

mod model;
pub mod paths;

pub use model::{
    ActiveDeployment, AppState, DeploymentRef, HealthPartition, Liveness, TaskHealthSample,
    TaskState,
};

use serde_json::Value;

use crate::deploy::DeployError;
use crate::gateway::{ApiResponse, OrchestratorGateway, TransportError};
use crate::types::{AppId, DeploymentId, Endpoint};

/// GET one application. The raw response is returned so callers can look
/// at the status (existence checks) as well as the body.
pub async fn fetch_application<G>(
    gateway: &G,
    endpoint: &Endpoint,
    app: &AppId,
) -> Result<ApiResponse, TransportError>
where
    G: OrchestratorGateway + ?Sized,
{
    gateway.get(&paths::app_url(endpoint, app)).await
}

/// Extract the `app` object of an application response.
///
/// Returns `Ok(None)` when the object is absent, null, or empty.
pub fn application_state(response: &ApiResponse) -> Result<Option<AppState>, DeployError> {
    let app = match response.body.get("app") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(map)) if map.is_empty() => return Ok(None),
        Some(app) => app,
    };

    serde_json::from_value(app.clone())
        .map(Some)
        .map_err(|e| DeployError::Deployment(format!("malformed application payload: {e}")))
}

/// GET the orchestrator-wide list of running deployments.
pub async fn fetch_active_deployments<G>(
    gateway: &G,
    endpoint: &Endpoint,
) -> Result<Vec<ActiveDeployment>, DeployError>
where
    G: OrchestratorGateway + ?Sized,
{
    let url = paths::deployments_url(endpoint);
    let response = gateway.get(&url).await?;

    if !response.is_success() {
        return Err(TransportError::UnexpectedStatus {
            url,
            status: response.status,
        }
        .into());
    }

    match response.body {
        Value::Null => Ok(Vec::new()),
        body => serde_json::from_value(body)
            .map_err(|e| DeployError::Deployment(format!("malformed deployments payload: {e}"))),
    }
}

pub fn filter_by_deployment_id<'a>(
    records: &'a [ActiveDeployment],
    id: &DeploymentId,
) -> Vec<&'a ActiveDeployment> {
    records.iter().filter(|r| &r.id == id).collect()
}

/// Records whose `affectedApps` contain `/<app>`.
pub fn filter_by_affected_app<'a>(
    records: &'a [ActiveDeployment],
    app: &AppId,
) -> Vec<&'a ActiveDeployment> {
    let path = app.path();
    records.iter().filter(|r| r.affects(&path)).collect()
}
