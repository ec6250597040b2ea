//! Error types module
//!
//! This module provides the core error types used throughout clipvault.
//! Store-level and codec-level errors are unified under the `AppError` enum so the
//! HTTP boundary can map each of them to a distinct status code and error code.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like rejected tokens
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INDEX_WRITE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage write error: {0}")]
    StorageWrite(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Index write error: {0}")]
    IndexWrite(String),

    #[error("Index query error: {0}")]
    IndexQuery(String),

    #[error("Invalid token signature: {0}")]
    InvalidSignature(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token not yet valid: {0}")]
    NotYetValid(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::StorageWrite(_) => (
            500,
            "STORAGE_WRITE_ERROR",
            true,
            Some("Retry the upload after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the file ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::IndexWrite(_) => (
            500,
            "INDEX_WRITE_ERROR",
            true,
            Some("Retry metadata completion with the same token"),
            true,
            LogLevel::Error,
        ),
        AppError::IndexQuery(_) => (
            502,
            "INDEX_QUERY_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InvalidSignature(_) => (
            401,
            "INVALID_TOKEN_SIGNATURE",
            false,
            Some("Use the metaToken returned by the file upload"),
            false,
            LogLevel::Warn,
        ),
        AppError::MalformedToken(_) => (
            401,
            "MALFORMED_TOKEN",
            false,
            Some("Use the metaToken returned by the file upload"),
            false,
            LogLevel::Warn,
        ),
        AppError::NotYetValid(_) => (
            401,
            "TOKEN_NOT_YET_VALID",
            true,
            Some("Check the client clock and retry"),
            false,
            LogLevel::Warn,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::StorageWrite(_) => "StorageWrite",
            AppError::NotFound(_) => "NotFound",
            AppError::IndexWrite(_) => "IndexWrite",
            AppError::IndexQuery(_) => "IndexQuery",
            AppError::InvalidSignature(_) => "InvalidSignature",
            AppError::MalformedToken(_) => "MalformedToken",
            AppError::NotYetValid(_) => "NotYetValid",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// True for the three token rejections, which surface as authentication failures.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AppError::InvalidSignature(_) | AppError::MalformedToken(_) | AppError::NotYetValid(_)
        )
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::StorageWrite(_) => "Failed to store file".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::IndexWrite(_) => "Failed to record video metadata".to_string(),
            AppError::IndexQuery(_) => "Failed to query video metadata".to_string(),
            AppError::InvalidSignature(_) => "Invalid metadata token".to_string(),
            AppError::MalformedToken(_) => "Malformed metadata token".to_string(),
            AppError::NotYetValid(_) => "Metadata token is not yet valid".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
