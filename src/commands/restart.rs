// ABOUTME: Restart command implementation.
// ABOUTME: Issues a rolling restart and waits until the application's deployments finish.

use super::target;
use crate::cli::TargetArgs;
use convoy::config::Config;
use convoy::deploy::Deployment;
use convoy::error::Result;
use convoy::output::Output;

/// Rolling restart on every endpoint of the target environment.
pub async fn restart(config: &Config, args: &TargetArgs, mut output: Output) -> Result<()> {
    output.start_timer();
    let target = target::resolve(config, args, &output)?;

    for endpoint in &target.endpoints {
        output.progress(&format!("  → Restarting {} on {}...", target.app.id(), endpoint));
        let deployment =
            Deployment::with_endpoint(endpoint.clone(), &target.app, target::gateway(config))
                .timeouts(config.timeouts());

        let response = deployment.rolling_restart().await?;
        target::require_success("restart", &response)?;

        output.progress("  → Waiting for restart to finish...");
        deployment.wait_for_application().await?;
    }

    output.success("Restart complete!");
    Ok(())
}
