// ABOUTME: Deploy command implementation.
// ABOUTME: Creates or updates the application, waits for the deployment, then for health.

use super::target::{self, Target};
use crate::cli::TargetArgs;
use convoy::config::Config;
use convoy::deploy::{DeployErrorKind, Deployment, HealthOutcome};
use convoy::diagnostics::{Diagnostics, Warning};
use convoy::error::Result;
use convoy::output::Output;
use convoy::types::Endpoint;

/// Deploy the application to every endpoint of the target environment.
pub async fn deploy(
    config: &Config,
    args: &TargetArgs,
    force: bool,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let target = target::resolve(config, args, &output)?;
    let mut diag = Diagnostics::default();

    output.progress(&format!(
        "Deploying {} ({} instance(s)) to {} endpoint(s) [{}]",
        target.app.id(),
        target.app.instances(),
        target.endpoints.len(),
        target.environment
    ));

    for endpoint in &target.endpoints {
        if let Err(e) =
            deploy_to_endpoint(config, &target, endpoint, force, &output, &mut diag).await
        {
            output.progress(&format!("  ✗ Deployment to {} failed", endpoint));
            for warning in diag.warnings() {
                output.warning(&warning.message);
            }
            return Err(e);
        }
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.success("Deployment complete!");
    Ok(())
}

/// Deploy to a single orchestrator.
async fn deploy_to_endpoint(
    config: &Config,
    target: &Target,
    endpoint: &Endpoint,
    force: bool,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<()> {
    let mut deployment =
        Deployment::with_endpoint(endpoint.clone(), &target.app, target::gateway(config))
            .timeouts(config.timeouts());

    output.progress(&format!("  → Connecting to {}...", endpoint));
    let response = if deployment.application_exists().await? {
        output.progress("  → Updating application...");
        deployment.update(force).await?
    } else {
        output.progress("  → Creating application...");
        deployment.create().await?
    };
    target::require_success("deployment", &response)?;

    let waited = match deployment.deployment_id() {
        Some(id) => {
            output.progress(&format!("  → Waiting for deployment {}...", id));
            deployment.wait_for_deployment_id().await
        }
        None => {
            output.progress("  → Waiting for application deployments...");
            deployment.wait_for_application().await
        }
    };

    if let Err(e) = waited {
        if e.kind() == DeployErrorKind::DeploymentTimeout && deployment.deployment_id().is_some() {
            output.progress("  → Cancelling timed out deployment...");
            if let Err(cancel_err) = deployment.cancel_current(true).await {
                diag.warn(Warning::cancel_failed(format!(
                    "failed to cancel deployment on {}: {}",
                    endpoint, cancel_err
                )));
            }
        }
        return Err(e.into());
    }

    output.progress("  → Waiting for instances to become healthy...");
    match deployment.wait_until_healthy().await? {
        HealthOutcome::NoHealthChecks => {
            output.progress("  ✓ Deployed (no health checks declared)");
        }
        HealthOutcome::Healthy { tasks } => {
            output.progress(&format!("  ✓ {} healthy instance(s)", tasks.len()));
        }
    }

    Ok(())
}
