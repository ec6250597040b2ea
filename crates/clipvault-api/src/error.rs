//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Store, index and codec errors
//! convert into `AppError` first and then into `HttpAppError`, which renders the status code,
//! the JSON body and the log line in one place.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clipvault_core::{AppError, ErrorMetadata, LinkTokenError, LogLevel};
use clipvault_index::IndexError;
use clipvault_storage::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: IntoResponse and AppError are both foreign to this crate)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<IndexError> for HttpAppError {
    fn from(err: IndexError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<LinkTokenError> for HttpAppError {
    fn from(err: LinkTokenError) -> Self {
        HttpAppError(err.into())
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl HttpAppError {
    fn error_response(&self, include_details: bool) -> ErrorResponse {
        let app_error = &self.0;
        ErrorResponse {
            error: app_error.client_message(),
            details: include_details.then(|| app_error.detailed_message()),
            error_type: include_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details only outside production, and never for sensitive errors.
        let include_details = !is_production_env() && !app_error.is_sensitive();
        let body = Json(self.error_response(include_details));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_not_found() {
        let HttpAppError(app_err) = StorageError::NotFound("abc".to_string()).into();
        match app_err {
            AppError::NotFound(msg) => assert!(msg.contains("abc")),
            other => panic!("Expected NotFound variant, got {:?}", other),
        }
    }

    #[test]
    fn test_from_storage_error_write_failed() {
        let HttpAppError(app_err) = StorageError::WriteFailed("disk full".to_string()).into();
        assert!(matches!(app_err, AppError::StorageWrite(_)));
        assert_eq!(app_err.http_status_code(), 500);
    }

    #[test]
    fn test_from_index_errors_keep_write_and_query_apart() {
        let HttpAppError(write) = IndexError::Write("down".to_string()).into();
        let HttpAppError(query) = IndexError::Query("down".to_string()).into();
        assert_eq!(write.error_code(), "INDEX_WRITE_ERROR");
        assert_eq!(query.error_code(), "INDEX_QUERY_ERROR");
    }

    #[test]
    fn test_from_link_token_error_is_unauthorized() {
        let HttpAppError(app_err) =
            LinkTokenError::InvalidSignature("bad".to_string()).into();
        assert_eq!(app_err.http_status_code(), 401);
    }

    #[test]
    fn test_sensitive_errors_hide_details() {
        let err = HttpAppError(AppError::IndexWrite("10.0.0.3:9200 refused".to_string()));
        let body = err.error_response(false);
        assert_eq!(body.error, "Failed to record video metadata");
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let err = HttpAppError(AppError::NotFound("Video f1 not found".to_string()));
        let json = serde_json::to_value(err.error_response(true)).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["recoverable"], false);
        assert_eq!(json["error_type"], "NotFound");
        assert!(json["details"].as_str().is_some());
        assert!(json["suggested_action"].as_str().is_some());
    }
}
