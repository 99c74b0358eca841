//! Error Types
//!
//! Errors surfaced by the backend client and configuration loading. Session
//! code never returns these to its caller; a failed request or poll becomes a
//! visible state transition instead.

use thiserror::Error;

/// Failure talking to the voice backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection, timeout or body-read failure
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("backend returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (possibly empty)
        body: String,
    },

    /// Response body did not have the expected shape
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

impl BackendError {
    /// Short label for logs and status lines
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Malformed(_) => "malformed",
        }
    }
}

/// Invalid configuration value
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        /// Variable name
        key: String,
        /// Raw value
        value: String,
        /// What was wrong with it
        reason: String,
    },

    /// Values parse individually but are inconsistent
    #[error("invalid configuration: {0}")]
    Validation(String),
}
