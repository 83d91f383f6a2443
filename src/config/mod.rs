// ABOUTME: Configuration types and parsing for convoy.yml.
// ABOUTME: Timeouts, orchestrator endpoints per environment, and descriptor requirements.

mod deserialize;
mod overlay;

pub use overlay::PreproductionConfig;

use crate::deploy::Timeouts;
use crate::error::{Error, Result};
use crate::types::Endpoint;
use deserialize::deserialize_endpoints;
use nonempty::NonEmpty;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "convoy.yml";
pub const CONFIG_FILENAME_ALT: &str = "convoy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".convoy/config.yml";

pub const DEFAULT_ENDPOINT_HOST: &str = "localhost";
pub const DEFAULT_ENDPOINT_PORT: u16 = 8080;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_wait_timeout", with = "humantime_serde")]
    pub deployment_timeout: Duration,

    #[serde(default = "default_recheck_interval", with = "humantime_serde")]
    pub deployment_recheck_interval: Duration,

    #[serde(default = "default_wait_timeout", with = "humantime_serde")]
    pub healthy_wait_timeout: Duration,

    #[serde(default = "default_recheck_interval", with = "humantime_serde")]
    pub healthy_wait_recheck_interval: Duration,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default = "default_production_environment")]
    pub production_environment: String,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default = "default_deploy_file")]
    pub deploy_file: PathBuf,

    #[serde(default = "default_required_attributes")]
    pub required_attributes: Vec<String>,

    #[serde(default = "default_required_env")]
    pub required_env: Vec<String>,

    #[serde(default)]
    pub preproduction: PreproductionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    #[serde(
        default = "default_endpoints",
        deserialize_with = "deserialize_endpoints"
    )]
    pub preproduction: NonEmpty<Endpoint>,

    #[serde(
        default = "default_endpoints",
        deserialize_with = "deserialize_endpoints"
    )]
    pub production: NonEmpty<Endpoint>,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            preproduction: default_endpoints(),
            production: default_endpoints(),
        }
    }
}

fn default_endpoints() -> NonEmpty<Endpoint> {
    NonEmpty::new(Endpoint::new(DEFAULT_ENDPOINT_HOST, DEFAULT_ENDPOINT_PORT))
}

fn default_wait_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_recheck_interval() -> Duration {
    Duration::from_secs(3)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_environment() -> String {
    "INTEGRATION".to_string()
}

fn default_production_environment() -> String {
    "PRODUCTION".to_string()
}

fn default_deploy_file() -> PathBuf {
    PathBuf::from("deploy.yaml")
}

fn default_required_attributes() -> Vec<String> {
    vec!["id".to_string()]
}

fn default_required_env() -> Vec<String> {
    vec!["DATACENTER_NUMBER".to_string(), "APPLICATION_NAME".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            deployment_timeout: default_wait_timeout(),
            deployment_recheck_interval: default_recheck_interval(),
            healthy_wait_timeout: default_wait_timeout(),
            healthy_wait_recheck_interval: default_recheck_interval(),
            request_timeout: default_request_timeout(),
            environment: default_environment(),
            production_environment: default_production_environment(),
            endpoints: EndpointsConfig::default(),
            deploy_file: default_deploy_file(),
            required_attributes: default_required_attributes(),
            required_env: default_required_env(),
            preproduction: PreproductionConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()
    }

    /// Reject recheck intervals that would turn the wait loops into a busy poll.
    fn validate(self) -> Result<Self> {
        let intervals = [
            ("deployment_recheck_interval", self.deployment_recheck_interval),
            ("healthy_wait_recheck_interval", self.healthy_wait_recheck_interval),
        ];
        for (name, interval) in intervals {
            if interval.is_zero() {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be greater than zero"
                )));
            }
        }
        Ok(self)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or the defaults if none.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Ok(Config::default())
    }

    /// Deadlines and recheck intervals for the deployment controller.
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            deployment: self.deployment_timeout,
            deployment_recheck: self.deployment_recheck_interval,
            healthy_wait: self.healthy_wait_timeout,
            healthy_recheck: self.healthy_wait_recheck_interval,
        }
    }

    pub fn is_production(&self, environment: &str) -> bool {
        environment.eq_ignore_ascii_case(&self.production_environment)
    }

    pub fn endpoints_for(&self, environment: &str) -> &NonEmpty<Endpoint> {
        if self.is_production(environment) {
            &self.endpoints.production
        } else {
            &self.endpoints.preproduction
        }
    }

    /// Apply the preproduction overlay to a descriptor document.
    /// The configuration itself is never modified.
    pub fn overlay_preproduction(&self, spec: &Value) -> Value {
        self.preproduction.apply(spec)
    }
}
