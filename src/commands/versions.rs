// ABOUTME: Versions command implementation.
// ABOUTME: Lists stored versions of an application that is not currently deployed.

use super::target;
use crate::cli::TargetArgs;
use convoy::config::Config;
use convoy::deploy::Deployment;
use convoy::error::Result;
use convoy::output::Output;

pub async fn versions(config: &Config, args: &TargetArgs, output: Output) -> Result<()> {
    let target = target::resolve(config, args, &output)?;

    for endpoint in &target.endpoints {
        let deployment =
            Deployment::with_endpoint(endpoint.clone(), &target.app, target::gateway(config));
        let versions = deployment.versions().await?;

        output.progress(&format!("{}:", endpoint));
        if versions.is_empty() {
            output.progress("  (none)");
        }
        for version in &versions {
            println!("{version}");
        }
    }

    output.success("Done");
    Ok(())
}
