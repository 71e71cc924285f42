//! Error types for capwatch.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for capwatch operations.
#[derive(Error, Debug)]
pub enum CapwatchError {
    /// Query service errors (endpoint unreachable, bad responses, etc.)
    #[error("Service error: {0}")]
    Service(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, terminal setup failures, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CapwatchError {
    /// Creates a service error with the given message.
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Service(_) => "Service Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using CapwatchError.
pub type Result<T> = std::result::Result<T, CapwatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_service() {
        let err = CapwatchError::service("endpoint https://query.invalid unreachable");
        assert_eq!(
            err.to_string(),
            "Service error: endpoint https://query.invalid unreachable"
        );
        assert_eq!(err.category(), "Service Error");
    }

    #[test]
    fn test_error_display_config() {
        let err = CapwatchError::config("missing field 'endpoint' in [service]");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing field 'endpoint' in [service]"
        );
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_error_display_internal() {
        let err = CapwatchError::internal("unexpected state");
        assert_eq!(err.to_string(), "Internal error: unexpected state");
        assert_eq!(err.category(), "Internal Error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CapwatchError>();
    }
}
