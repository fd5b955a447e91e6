//! Shared Error Types
//!
//! Errors that are not tied to the network or the local store: malformed
//! JSON and input that fails validation before anything is sent.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Input rejected locally (empty category, no answers, ...)
//!
//! # Usage
//!
//! ```rust
//! use feedback_client::shared::error::SharedError;
//!
//! let error = SharedError::validation("category", "Category cannot be empty");
//! assert!(error.to_string().contains("category"));
//! ```
use thiserror::Error;

/// Errors raised before a request leaves the device
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Reject empty or whitespace-only input
pub fn require_non_empty(field: &str, value: &str) -> Result<(), SharedError> {
    if value.trim().is_empty() {
        return Err(SharedError::validation(field, format!("{} cannot be empty", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("answers", "No answers for this category");
        match error {
            SharedError::ValidationError { field, message } => {
                assert_eq!(field, "answers");
                assert_eq!(message, "No answers for this category");
            }
            _ => panic!("Expected ValidationError"),
        }
    }

    #[test]
    fn test_error_display() {
        let error = SharedError::serialization("bad queue blob");
        let display = format!("{}", error);
        assert!(display.contains("Serialization error"));
        assert!(display.contains("bad queue blob"));
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("email", "a@b.c").is_ok());
        assert!(matches!(
            require_non_empty("email", "   "),
            Err(SharedError::ValidationError { field, .. }) if field == "email"
        ));
    }

    #[test]
    fn test_from_serde_error() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ not json }");
        let shared_error: SharedError = result.unwrap_err().into();
        assert!(matches!(shared_error, SharedError::SerializationError { .. }));
    }
}
