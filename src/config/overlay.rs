// ABOUTME: Preproduction overlay of application descriptors.
// ABOUTME: Caps resource properties and injects environment defaults outside production.

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PreproductionConfig {
    /// Upper bounds for numeric top-level properties.
    #[serde(default = "default_overrides")]
    pub overrides: BTreeMap<String, Number>,

    /// Entries written into the descriptor's `env`.
    #[serde(default = "default_env")]
    pub env: BTreeMap<String, String>,
}

impl Default for PreproductionConfig {
    fn default() -> Self {
        Self {
            overrides: default_overrides(),
            env: default_env(),
        }
    }
}

fn default_overrides() -> BTreeMap<String, Number> {
    let mut overrides = BTreeMap::new();
    overrides.insert("instances".to_string(), Number::from(20));
    overrides.insert("mem".to_string(), Number::from(512));
    if let Some(cpus) = Number::from_f64(0.1) {
        overrides.insert("cpus".to_string(), cpus);
    }
    overrides
}

fn default_env() -> BTreeMap<String, String> {
    [
        ("DATACENTER_NUMBER", "44"),
        ("JAVA_XMS", "64m"),
        ("JAVA_XMX", "128m"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl PreproductionConfig {
    /// Return a copy of `spec` with ceilings and env entries applied.
    ///
    /// Properties that are absent or not numeric are left untouched.
    pub fn apply(&self, spec: &Value) -> Value {
        let mut spec = spec.clone();
        let Some(map) = spec.as_object_mut() else {
            return spec;
        };

        for (property, ceiling) in &self.overrides {
            let given = map.get(property).and_then(Value::as_f64);
            let limit = ceiling.as_f64();
            if let (Some(given), Some(limit)) = (given, limit)
                && given > limit
            {
                tracing::debug!(
                    "Overriding property [{}: {}] with preproduction default [{}: {}]",
                    property,
                    given,
                    property,
                    ceiling
                );
                map.insert(property.clone(), Value::Number(ceiling.clone()));
            }
        }

        let env = map
            .entry("env")
            .or_insert_with(|| Value::Object(Map::new()));
        if !env.is_object() {
            *env = Value::Object(Map::new());
        }
        if let Some(env) = env.as_object_mut() {
            for (name, value) in &self.env {
                env.insert(name.clone(), Value::String(value.clone()));
            }
        }

        spec
    }
}
