// ABOUTME: Shared helper resolving the descriptor and endpoints a command acts on.
// ABOUTME: Eliminates duplication across deploy, restart, cancel, and versions commands.

use crate::cli::TargetArgs;
use convoy::app::{self, ApplicationDescriptor};
use convoy::config::Config;
use convoy::error::{Error, Result};
use convoy::gateway::{ApiResponse, HttpGateway};
use convoy::output::Output;
use convoy::types::Endpoint;

/// Everything a command needs to build a deployment controller.
pub struct Target {
    pub app: ApplicationDescriptor,
    pub endpoints: Vec<Endpoint>,
    pub environment: String,
}

/// Load and validate the descriptor, apply the preproduction overlay when
/// the environment is not production, and pick the endpoints.
pub fn resolve(config: &Config, args: &TargetArgs, output: &Output) -> Result<Target> {
    let environment = args
        .environment
        .clone()
        .unwrap_or_else(|| config.environment.clone());
    let file = args.file.clone().unwrap_or_else(|| config.deploy_file.clone());

    output.progress(&format!("  → Loading {} ({})...", file.display(), environment));
    let document = app::load_document(&file)?;

    let missing = app::missing_attributes(&document, &config.required_attributes);
    if !missing.is_empty() {
        return Err(Error::MissingAttributes(missing));
    }

    let document = if config.is_production(&environment) {
        document
    } else {
        config.overlay_preproduction(&document)
    };

    let missing = app::missing_env(&document, &config.required_env);
    if !missing.is_empty() {
        return Err(Error::MissingEnv(missing));
    }

    let app = ApplicationDescriptor::from_value(document)?;

    let endpoints = match &args.endpoint {
        Some(url) => vec![
            Endpoint::parse(url).map_err(|e| Error::InvalidConfig(e.to_string()))?,
        ],
        None => config.endpoints_for(&environment).iter().cloned().collect(),
    };

    Ok(Target {
        app,
        endpoints,
        environment,
    })
}

pub fn gateway(config: &Config) -> HttpGateway {
    HttpGateway::new().request_timeout(config.request_timeout)
}

/// Turn a non-2xx orchestrator answer into an error.
pub fn require_success(action: &'static str, response: &ApiResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }

    let message = response
        .body
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| response.body.to_string());

    Err(Error::Rejected {
        action,
        status: response.status,
        message,
    })
}
