//! Streaming access to the multipart `upload` field.

use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use clipvault_core::AppError;
use clipvault_storage::UploadReader;
use futures::TryStreamExt;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use tokio_util::io::StreamReader;

/// Multipart field carrying the video content.
pub const UPLOAD_FIELD: &str = "upload";

/// Records the first error the multipart stream raised while the upload field was being
/// consumed, so the resulting write failure is reported as the client error it was (400 or
/// 413) instead of 500.
#[derive(Clone, Default)]
pub struct FieldStreamStatus(Arc<AtomicU16>);

impl FieldStreamStatus {
    fn record(&self, status: StatusCode) {
        let _ = self
            .0
            .compare_exchange(0, status.as_u16(), Ordering::Relaxed, Ordering::Relaxed);
    }

    /// Status of the recorded stream error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self.0.load(Ordering::Relaxed) {
            0 => None,
            code => StatusCode::from_u16(code).ok(),
        }
    }

    /// Turn a storage write failure caused by the request body into a client error.
    pub fn classify(&self, err: AppError) -> AppError {
        match (self.status(), err) {
            (Some(StatusCode::PAYLOAD_TOO_LARGE), AppError::StorageWrite(_)) => {
                AppError::PayloadTooLarge("Upload exceeds the maximum allowed size".to_string())
            }
            (Some(_), AppError::StorageWrite(_)) => AppError::InvalidInput(
                "Upload body ended unexpectedly or is not valid multipart".to_string(),
            ),
            (_, err) => err,
        }
    }
}

/// Map a multipart parsing failure to an `AppError`.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum allowed size".to_string())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Adapt a multipart field into a byte reader without buffering it.
pub fn field_reader<'a>(field: Field<'a>, status: &FieldStreamStatus) -> UploadReader<'a> {
    let status = status.clone();
    let chunks = field.map_err(move |e| {
        status.record(e.status());
        std::io::Error::other(e)
    });
    Box::pin(StreamReader::new(Box::pin(chunks)))
}
