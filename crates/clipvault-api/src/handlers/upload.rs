use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{field_reader, multipart_error, FieldStreamStatus, UPLOAD_FIELD};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use clipvault_core::models::FileUploadResponse;
use clipvault_core::AppError;
use std::sync::Arc;
use utoipa::ToSchema;

/// Multipart body of `POST /upload/file`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadFileForm {
    /// Video content
    #[schema(value_type = String, format = Binary)]
    upload: Vec<u8>,
}

/// Phase 1 of an upload: store the video and return its ID with a metadata token.
///
/// The first `upload` field is streamed to the blob store; other fields before it are
/// skipped and the rest of the body is not read.
#[utoipa::path(
    post,
    path = "/upload/file",
    tag = "upload",
    request_body(content = UploadFileForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video stored", body = FileUploadResponse),
        (status = 400, description = "Missing upload field or malformed multipart body", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Storage write failure", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FileUploadResponse>, HttpAppError> {
    let mut multipart = multipart.map_err(|e| {
        AppError::InvalidInput(format!(
            "Expected a multipart/form-data body: {}",
            e.body_text()
        ))
    })?;
    let stream_status = FieldStreamStatus::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            tracing::debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let receipt = state
            .ingestion
            .begin_upload(field_reader(field, &stream_status))
            .await
            .map_err(|e| stream_status.classify(e))?;

        return Ok(Json(FileUploadResponse {
            id: receipt.file_id,
            meta_token: receipt.token,
        }));
    }

    Err(AppError::InvalidInput(format!(
        "Multipart field '{}' is required",
        UPLOAD_FIELD
    ))
    .into())
}
