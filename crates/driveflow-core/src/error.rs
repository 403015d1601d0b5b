//! Error types module
//!
//! All errors are unified under the `AppError` enum, which covers validation,
//! authentication, storage lookup, and upstream (drive / webhook) failures.
//! The `ErrorMetadata` trait maps each error onto its HTTP presentation so the
//! API layer never hand-picks status codes.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like upstream failures
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
/// This trait allows errors to self-describe their HTTP response characteristics.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g. "VALIDATION_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote endpoint returned status {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Short type tag for structured log fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "unauthorized",
            AppError::BadRequest(_) => "bad_request",
            AppError::NotFound(_) => "not_found",
            AppError::Network(_) => "network",
            AppError::Remote { .. } => "remote",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "internal",
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::Unauthorized(_) => 401,
            AppError::BadRequest(_) => 400,
            AppError::NotFound(_) => 404,
            // The trigger route contract reports any dispatch failure as 500.
            AppError::Network(_) | AppError::Remote { .. } => 500,
            AppError::Internal(_) | AppError::InternalWithSource { .. } => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::BadRequest(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::Remote { .. } => "REMOTE_ERROR",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Remote { .. })
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Unauthorized(_) => Some("Provide the X-User-Id header"),
            AppError::BadRequest(_) => Some("Check the request body and URLs"),
            AppError::Network(_) | AppError::Remote { .. } => {
                Some("Verify the endpoint is reachable and retry manually")
            }
            _ => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            // Internal details stay in the logs.
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::Unauthorized(_) | AppError::BadRequest(_) | AppError::NotFound(_) => {
                LogLevel::Debug
            }
            AppError::Network(_) | AppError::Remote { .. } => LogLevel::Warn,
            AppError::Internal(_) | AppError::InternalWithSource { .. } => LogLevel::Error,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(AppError::Unauthorized("x".into()).http_status_code(), 401);
        assert_eq!(AppError::BadRequest("x".into()).http_status_code(), 400);
        assert_eq!(AppError::NotFound("x".into()).http_status_code(), 404);
        assert_eq!(AppError::Network("x".into()).http_status_code(), 500);
        assert_eq!(
            AppError::Remote {
                status: 503,
                message: "down".into()
            }
            .http_status_code(),
            500
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = AppError::Internal("lock poisoned".into());
        assert_eq!(err.client_message(), "Internal server error");
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_upstream_errors_are_recoverable() {
        assert!(AppError::Network("timeout".into()).is_recoverable());
        assert!(!AppError::BadRequest("bad url".into()).is_recoverable());
    }
}
