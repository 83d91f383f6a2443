// ABOUTME: hyper-based HTTP/1.1 client for the orchestrator REST API.
// ABOUTME: One connection per request, JSON in and out.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{ACCEPT, CONTENT_TYPE, HOST};
use hyper::{Method, Request, Uri};
use hyper_util::rt::TokioIo;
use serde_json::Value;
use snafu::ResultExt;
use std::time::Duration;
use tokio::net::TcpStream;

use super::error::{
    ConnectSnafu, DecodeSnafu, EncodeSnafu, HandshakeSnafu, ReadBodySnafu, SendRequestSnafu,
};
use super::{ApiResponse, OrchestratorGateway, TransportError};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpGateway {
    request_timeout: Duration,
}

impl HttpGateway {
    pub fn new() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Upper bound for a single request, connection included.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, TransportError> {
        match tokio::time::timeout(self.request_timeout, self.exchange(method, url, body)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(TransportError::Timeout {
                url: url.to_string(),
                after: self.request_timeout,
            }),
        }
    }

    async fn exchange(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, TransportError> {
        let uri = url.parse::<Uri>().map_err(|e| TransportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let host = uri.host().ok_or_else(|| TransportError::InvalidUrl {
            url: url.to_string(),
            reason: "missing host".to_string(),
        })?;
        let port = uri.port_u16().unwrap_or(80);
        let address = format!("{host}:{port}");
        let path = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
            .to_string();

        let stream = TcpStream::connect(&address)
            .await
            .context(ConnectSnafu {
                address: address.clone(),
            })?;
        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .context(HandshakeSnafu {
                address: address.clone(),
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("orchestrator connection error: {}", e);
            }
        });

        let payload = match body {
            Some(value) => Bytes::from(serde_json::to_vec(value).context(EncodeSnafu { url })?),
            None => Bytes::new(),
        };

        let req = Request::builder()
            .method(method.clone())
            .uri(&path)
            .header(HOST, &address)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(payload))
            .map_err(|e| TransportError::BuildRequest {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(%method, url, "calling orchestrator");
        let resp = sender.send_request(req).await.context(SendRequestSnafu { url })?;
        let status = resp.status().as_u16();

        let collected = resp
            .into_body()
            .collect()
            .await
            .context(ReadBodySnafu { url })?;
        let bytes = collected.to_bytes();

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context(DecodeSnafu { url })?
        };

        Ok(ApiResponse::new(status, body))
    }
}

impl Default for HttpGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrchestratorGateway for HttpGateway {
    async fn get(&self, url: &str) -> Result<ApiResponse, TransportError> {
        self.send(Method::GET, url, None).await
    }

    async fn post(&self, url: &str, body: &Value) -> Result<ApiResponse, TransportError> {
        self.send(Method::POST, url, Some(body)).await
    }

    async fn put(&self, url: &str, body: &Value) -> Result<ApiResponse, TransportError> {
        self.send(Method::PUT, url, Some(body)).await
    }

    async fn delete(&self, url: &str) -> Result<ApiResponse, TransportError> {
        self.send(Method::DELETE, url, None).await
    }
}
