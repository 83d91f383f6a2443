// ABOUTME: Application descriptor submitted to the orchestrator.
// ABOUTME: Parses YAML/JSON deploy files and checks required attributes and env variables.

use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::types::{AppId, AppIdError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read deploy file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("deploy file parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("application descriptor must be a mapping")]
    NotAMapping,

    #[error("application descriptor has no id")]
    MissingId,

    #[error(transparent)]
    InvalidId(#[from] AppIdError),

    #[error("instances must be a positive integer, got {0}")]
    InvalidInstances(Value),
}

/// The application to deploy: identity, desired instance count, whether
/// health checks are declared, and the payload sent to the orchestrator.
///
/// Immutable once built; the controller only borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationDescriptor {
    id: AppId,
    instances: u32,
    health_checks_defined: bool,
    spec: Value,
}

impl ApplicationDescriptor {
    /// Build a descriptor from a decoded application document.
    ///
    /// `instances` defaults to 1 when absent.
    pub fn from_value(spec: Value) -> Result<Self, AppError> {
        let map = spec.as_object().ok_or(AppError::NotAMapping)?;

        let id = match map.get("id") {
            Some(Value::String(s)) => AppId::new(s)?,
            Some(Value::Null) | None => return Err(AppError::MissingId),
            Some(other) => AppId::new(&other.to_string())?,
        };

        let instances = match map.get("instances") {
            None | Some(Value::Null) => 1,
            Some(value) => value
                .as_u64()
                .filter(|n| *n > 0)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| AppError::InvalidInstances(value.clone()))?,
        };

        let health_checks_defined = map
            .get("healthChecks")
            .and_then(Value::as_array)
            .is_some_and(|checks| !checks.is_empty());

        Ok(Self {
            id,
            instances,
            health_checks_defined,
            spec,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, AppError> {
        Self::from_value(parse_document(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        Self::from_value(load_document(path)?)
    }

    pub fn id(&self) -> &AppId {
        &self.id
    }

    /// Desired number of healthy instances.
    pub fn instances(&self) -> u32 {
        self.instances
    }

    pub fn health_checks_defined(&self) -> bool {
        self.health_checks_defined
    }

    /// Payload sent verbatim on create and update.
    pub fn spec(&self) -> &Value {
        &self.spec
    }
}

/// Decode a YAML or JSON application document.
pub fn parse_document(text: &str) -> Result<Value, AppError> {
    Ok(serde_yaml::from_str::<Value>(text)?)
}

pub fn load_document(path: &Path) -> Result<Value, AppError> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_document(&text)
}

/// Top-level attributes from `required` that are absent or null.
pub fn missing_attributes(spec: &Value, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|name| spec.get(name.as_str()).is_none_or(Value::is_null))
        .cloned()
        .collect()
}

/// Entries of `required` missing from the document's `env` mapping.
///
/// A document without an `env` mapping is missing all of them.
pub fn missing_env(spec: &Value, required: &[String]) -> Vec<String> {
    let env = spec.get("env").and_then(Value::as_object);
    required
        .iter()
        .filter(|name| {
            env.and_then(|e| e.get(name.as_str()))
                .is_none_or(Value::is_null)
        })
        .cloned()
        .collect()
}
