//! Client Error Types
//!
//! Every fallible client operation returns [`ClientResult`]. Network-side
//! failures are split so callers can tell "try again later" (`Network`,
//! `Timeout`) apart from "the server said no" (`Status`).

use crate::shared::{ConfigError, SharedError};
use thiserror::Error;

/// Result alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: no connectivity, DNS, refused connection
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Server answered with a non-2xx status
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// No valid session token
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Session lacks the admin role
    #[error("Admin privileges required")]
    Forbidden,

    #[error("Local storage error: {0}")]
    Storage(String),

    /// A background task of this kind is already running
    #[error("{0} is already running")]
    AlreadyRunning(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shared(#[from] SharedError),
}

impl ClientError {
    /// True for failures that an offline fallback should absorb
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Timeout(_))
    }

    /// HTTP status code, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for ClientError {
    fn from(err: sqlx::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Shared(SharedError::from(err))
    }
}
