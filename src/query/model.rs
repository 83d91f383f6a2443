// ABOUTME: Orchestrator response shapes read by the wait loops.
// ABOUTME: Application state, active deployment records, and per-task health samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::types::{DeploymentId, TaskId};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// One entry of the orchestrator-wide active deployments list.
///
/// Always re-fetched; never cached between polls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDeployment {
    pub id: DeploymentId,

    #[serde(default, deserialize_with = "null_as_default")]
    pub affected_apps: Vec<String>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub version: Option<DateTime<Utc>>,

    /// Remaining fields, kept for debug output.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActiveDeployment {
    pub fn affects(&self, app_path: &str) -> bool {
        self.affected_apps.iter().any(|a| a == app_path)
    }

    /// Multi-line human readable summary, keys in sorted order.
    pub fn describe(&self) -> String {
        let rule = "+-".repeat(25);
        let mut out = format!("\n{rule} DEPLOYMENT INFO {rule}\n");
        out.push_str(&format!("affectedApps => {}\n", self.affected_apps.join(",")));
        out.push_str(&format!("id => {}\n", self.id));
        for (key, value) in &self.extra {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Array(items) => items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect::<Vec<_>>()
                    .join(","),
                other => other.to_string(),
            };
            out.push_str(&format!("{key} => {rendered}\n"));
        }
        if let Some(version) = self.version {
            out.push_str(&format!("version => {}\n", version.to_rfc3339()));
        }
        out
    }
}

/// Reference to a deployment listed on an application.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentRef {
    pub id: DeploymentId,
}

/// A running task with its raw health check results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskState {
    pub id: TaskId,

    #[serde(default, deserialize_with = "null_as_default")]
    pub health_check_results: Vec<Value>,
}

/// Current state of one application as reported by the orchestrator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub id: String,

    #[serde(default)]
    pub instances: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub health_checks: Vec<Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub deployments: Vec<DeploymentRef>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<TaskState>,
}

impl AppState {
    pub fn health_checks_defined(&self) -> bool {
        !self.health_checks.is_empty()
    }

    /// The deployment the orchestrator lists first, which is the newest one.
    pub fn latest_deployment_id(&self) -> Option<DeploymentId> {
        self.deployments.first().map(|d| d.id.clone())
    }

    /// One sample per health check result across all tasks.
    ///
    /// Null results are skipped. A result without its own `taskId` is
    /// attributed to the enclosing task.
    pub fn health_samples(&self) -> Vec<TaskHealthSample> {
        self.tasks
            .iter()
            .flat_map(|task| {
                task.health_check_results
                    .iter()
                    .filter(|r| !r.is_null())
                    .map(move |result| TaskHealthSample {
                        task_id: result
                            .get("taskId")
                            .and_then(Value::as_str)
                            .map(TaskId::new)
                            .unwrap_or_else(|| task.id.clone()),
                        liveness: Liveness::from_value(result.get("alive")),
                    })
            })
            .collect()
    }
}

/// Tri-state health of a task as reported by one health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    Dead,
    Unknown,
}

impl Liveness {
    /// Only the JSON booleans count; anything else is unknown.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Bool(true)) => Liveness::Alive,
            Some(Value::Bool(false)) => Liveness::Dead,
            _ => Liveness::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHealthSample {
    pub task_id: TaskId,
    pub liveness: Liveness,
}

/// Task ids split by explicit health. Unknown samples are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthPartition {
    pub healthy: Vec<TaskId>,
    pub unhealthy: Vec<TaskId>,
}

impl HealthPartition {
    pub fn from_samples(samples: &[TaskHealthSample]) -> Self {
        let mut partition = HealthPartition::default();
        for sample in samples {
            match sample.liveness {
                Liveness::Alive => partition.healthy.push(sample.task_id.clone()),
                Liveness::Dead => partition.unhealthy.push(sample.task_id.clone()),
                Liveness::Unknown => {}
            }
        }
        partition
    }
}
