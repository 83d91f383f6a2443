// ABOUTME: Validated application identifier as understood by the orchestrator.
// ABOUTME: Accepts group paths (a/b/c) and normalizes away a leading slash.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppIdError {
    #[error("application id cannot be empty")]
    Empty,

    #[error("application id cannot end with '/'")]
    TrailingSlash,

    #[error("application id must be lowercase")]
    NotLowercase,

    #[error("invalid character in application id: '{0}'")]
    InvalidChar(char),
}

/// Application id without its leading `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppId(String);

impl AppId {
    pub fn new(value: &str) -> Result<Self, AppIdError> {
        let trimmed = value.trim();
        let id = trimmed.strip_prefix('/').unwrap_or(trimmed);

        if id.is_empty() {
            return Err(AppIdError::Empty);
        }

        if id.ends_with('/') {
            return Err(AppIdError::TrailingSlash);
        }

        for c in id.chars() {
            if c.is_ascii_uppercase() {
                return Err(AppIdError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && !matches!(c, '-' | '.' | '/' | '_')
            {
                return Err(AppIdError::InvalidChar(c));
            }
        }

        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The absolute path the orchestrator reports in `affectedApps`.
    pub fn path(&self) -> String {
        format!("/{}", self.0)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
