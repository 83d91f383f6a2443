// ABOUTME: Orchestrator REST boundary: request verbs, decoded responses, transport errors.
// ABOUTME: HttpGateway is the hyper-backed implementation used by the CLI.

mod error;
mod http;

pub use error::{TransportError, TransportErrorKind};
pub use http::HttpGateway;

use async_trait::async_trait;
use serde_json::Value;

/// A decoded orchestrator response.
///
/// Non-2xx statuses are ordinary responses; only failures to complete the
/// exchange are errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Decoded JSON body, `Value::Null` when the body was empty.
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs HTTP verbs against the orchestrator.
///
/// URLs are absolute (`http://host:port/v2/...`); request bodies are JSON.
#[async_trait]
pub trait OrchestratorGateway: Send + Sync {
    async fn get(&self, url: &str) -> Result<ApiResponse, TransportError>;

    async fn post(&self, url: &str, body: &Value) -> Result<ApiResponse, TransportError>;

    async fn put(&self, url: &str, body: &Value) -> Result<ApiResponse, TransportError>;

    async fn delete(&self, url: &str) -> Result<ApiResponse, TransportError>;
}

#[async_trait]
impl<G: OrchestratorGateway + ?Sized> OrchestratorGateway for std::sync::Arc<G> {
    async fn get(&self, url: &str) -> Result<ApiResponse, TransportError> {
        (**self).get(url).await
    }

    async fn post(&self, url: &str, body: &Value) -> Result<ApiResponse, TransportError> {
        (**self).post(url, body).await
    }

    async fn put(&self, url: &str, body: &Value) -> Result<ApiResponse, TransportError> {
        (**self).put(url, body).await
    }

    async fn delete(&self, url: &str) -> Result<ApiResponse, TransportError> {
        (**self).delete(url).await
    }
}
