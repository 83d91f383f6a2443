// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates orchestrator endpoint lists.

use nonempty::NonEmpty;
use serde::Deserialize;

use crate::types::Endpoint;

pub fn deserialize_endpoints<'de, D>(deserializer: D) -> Result<NonEmpty<Endpoint>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<EndpointEntry> = Vec::deserialize(deserializer)?;
    let endpoints = values
        .into_iter()
        .map(EndpointEntry::into_endpoint)
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)?;

    NonEmpty::from_vec(endpoints)
        .ok_or_else(|| serde::de::Error::custom("at least one endpoint is required"))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EndpointEntry {
    Simple(String),
    Detailed { url: String },
}

impl EndpointEntry {
    fn into_endpoint(self) -> Result<Endpoint, String> {
        let url = match self {
            EndpointEntry::Simple(url) | EndpointEntry::Detailed { url } => url,
        };
        Endpoint::parse(&url).map_err(|e| e.to_string())
    }
}
