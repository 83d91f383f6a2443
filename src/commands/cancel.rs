// ABOUTME: Cancel command implementation.
// ABOUTME: Cancels a deployment on every endpoint where it is still running.

use super::target;
use crate::cli::TargetArgs;
use convoy::config::Config;
use convoy::deploy::Deployment;
use convoy::diagnostics::{Diagnostics, Warning};
use convoy::error::Result;
use convoy::output::Output;

pub async fn cancel(
    config: &Config,
    args: &TargetArgs,
    deployment_id: &str,
    force: bool,
    output: Output,
) -> Result<()> {
    let target = target::resolve(config, args, &output)?;
    let mut diag = Diagnostics::default();
    let mut cancelled = 0;

    for endpoint in &target.endpoints {
        let deployment =
            Deployment::with_endpoint(endpoint.clone(), &target.app, target::gateway(config));

        match deployment.cancel(deployment_id, force).await? {
            Some(response) if response.is_success() => {
                output.progress(&format!("  ✓ Cancelled {} on {}", deployment_id, endpoint));
                cancelled += 1;
            }
            Some(response) => diag.warn(Warning::unexpected_status(format!(
                "cancel of {} on {} returned status {}",
                deployment_id, endpoint, response.status
            ))),
            None => output.progress(&format!(
                "  → {} is not running on {}",
                deployment_id, endpoint
            )),
        }
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.success(&format!("Cancelled {} deployment(s)", cancelled));
    Ok(())
}
