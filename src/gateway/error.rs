// ABOUTME: Transport error types with SNAFU pattern.
// ABOUTME: Covers connection, request, and body decoding failures at the orchestrator boundary.

use snafu::Snafu;
use std::time::Duration;

/// Failure to complete an HTTP exchange with the orchestrator.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TransportError {
    #[snafu(display("invalid request url {url}: {reason}"))]
    InvalidUrl { url: String, reason: String },

    #[snafu(display("failed to connect to {address}: {source}"))]
    Connect {
        address: String,
        source: std::io::Error,
    },

    #[snafu(display("HTTP handshake with {address} failed: {source}"))]
    Handshake {
        address: String,
        source: hyper::Error,
    },

    #[snafu(display("failed to build request for {url}: {reason}"))]
    BuildRequest { url: String, reason: String },

    #[snafu(display("request to {url} failed: {source}"))]
    SendRequest { url: String, source: hyper::Error },

    #[snafu(display("failed to read response from {url}: {source}"))]
    ReadBody { url: String, source: hyper::Error },

    #[snafu(display("failed to encode request body for {url}: {source}"))]
    Encode {
        url: String,
        source: serde_json::Error,
    },

    #[snafu(display("response from {url} is not valid JSON: {source}"))]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[snafu(display("request to {url} timed out after {}s", after.as_secs()))]
    Timeout { url: String, after: Duration },

    #[snafu(display("unexpected status {status} from {url}"))]
    UnexpectedStatus { url: String, status: u16 },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The URL could not be turned into a request.
    InvalidRequest,
    /// The orchestrator could not be reached.
    Connection,
    /// The exchange started but did not complete.
    Exchange,
    /// The response body was not JSON.
    Decode,
    /// The orchestrator answered with a status the caller cannot use.
    Status,
}

impl TransportError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            TransportError::InvalidUrl { .. }
            | TransportError::BuildRequest { .. }
            | TransportError::Encode { .. } => TransportErrorKind::InvalidRequest,
            TransportError::Connect { .. } | TransportError::Handshake { .. } => {
                TransportErrorKind::Connection
            }
            TransportError::SendRequest { .. }
            | TransportError::ReadBody { .. }
            | TransportError::Timeout { .. } => TransportErrorKind::Exchange,
            TransportError::Decode { .. } => TransportErrorKind::Decode,
            TransportError::UnexpectedStatus { .. } => TransportErrorKind::Status,
        }
    }
}
