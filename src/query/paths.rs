// ABOUTME: REST paths of the orchestrator API.
// ABOUTME: Builds absolute URLs from a validated endpoint.

use crate::types::{AppId, DeploymentId, Endpoint};

pub const APPS_PATH: &str = "/v2/apps";
pub const DEPLOYMENTS_PATH: &str = "/v2/deployments";

pub fn apps_url(endpoint: &Endpoint) -> String {
    endpoint.join(APPS_PATH)
}

pub fn app_url(endpoint: &Endpoint, app: &AppId) -> String {
    endpoint.join(&format!("{APPS_PATH}/{app}"))
}

pub fn update_url(endpoint: &Endpoint, app: &AppId, force: bool) -> String {
    let url = app_url(endpoint, app);
    if force { format!("{url}?force=true") } else { url }
}

pub fn versions_url(endpoint: &Endpoint, app: &AppId) -> String {
    endpoint.join(&format!("{APPS_PATH}/{app}/versions"))
}

pub fn restart_url(endpoint: &Endpoint, app: &AppId) -> String {
    endpoint.join(&format!("{APPS_PATH}/{app}/restart"))
}

pub fn deployments_url(endpoint: &Endpoint) -> String {
    endpoint.join(DEPLOYMENTS_PATH)
}

pub fn cancel_url(endpoint: &Endpoint, deployment: &DeploymentId, force: bool) -> String {
    endpoint.join(&format!(
        "{DEPLOYMENTS_PATH}/{}?force={force}",
        urlencoding::encode(deployment.as_str())
    ))
}
