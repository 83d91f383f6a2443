// ABOUTME: Validated orchestrator base URL.
// ABOUTME: Only plain http endpoints with a host are accepted; trailing slashes are dropped.

use hyper::Uri;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("endpoint cannot be empty")]
    Empty,

    #[error("invalid endpoint url '{url}': {reason}")]
    Invalid { url: String, reason: String },

    #[error("unsupported scheme in endpoint '{0}' (expected http)")]
    UnsupportedScheme(String),

    #[error("endpoint '{0}' has no host")]
    MissingHost(String),

    #[error("endpoint '{0}' must not carry a query string")]
    HasQuery(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
    host: String,
    port: u16,
}

impl Endpoint {
    /// Endpoint at the root of `http://{host}:{port}`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        Self {
            base: format!("http://{host}:{port}"),
            host,
            port,
        }
    }

    pub fn parse(input: &str) -> Result<Self, EndpointError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(EndpointError::Empty);
        }

        let uri = input
            .parse::<Uri>()
            .map_err(|e| EndpointError::Invalid {
                url: input.to_string(),
                reason: e.to_string(),
            })?;

        match uri.scheme_str() {
            Some("http") => {}
            _ => return Err(EndpointError::UnsupportedScheme(input.to_string())),
        }

        let host = match uri.host() {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => return Err(EndpointError::MissingHost(input.to_string())),
        };

        if uri.query().is_some() {
            return Err(EndpointError::HasQuery(input.to_string()));
        }

        let port = uri.port_u16().unwrap_or(80);
        let authority = match uri.port_u16() {
            Some(p) => format!("{host}:{p}"),
            None => host.clone(),
        };
        let path = uri.path().trim_end_matches('/');

        Ok(Self {
            base: format!("http://{authority}{path}"),
            host,
            port,
        })
    }

    /// Append an absolute path (starting with `/`) to the base URL.
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)
    }
}
