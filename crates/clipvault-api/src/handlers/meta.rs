use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::validation::validate_upload_meta;
use axum::extract::{Path, State};
use axum::Json;
use clipvault_core::models::UploadMetaRequest;
use clipvault_core::VideoMetadata;
use std::sync::Arc;

/// Phase 2 of an upload: attach a title to a stored video using its metadata token.
#[utoipa::path(
    post,
    path = "/upload/meta",
    tag = "upload",
    request_body = UploadMetaRequest,
    responses(
        (status = 200, description = "Metadata recorded", body = VideoMetadata),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Invalid, malformed or not yet valid token", body = ErrorResponse),
        (status = 500, description = "Metadata write failure", body = ErrorResponse)
    )
)]
pub async fn upload_meta(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UploadMetaRequest>,
) -> Result<Json<VideoMetadata>, HttpAppError> {
    let title = validate_upload_meta(&request)?;
    let metadata = state
        .ingestion
        .complete_upload(request.meta_token.trim(), &title)
        .await?;
    Ok(Json(metadata))
}

#[utoipa::path(
    get,
    path = "/meta/{id}",
    tag = "videos",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Video metadata", body = VideoMetadata),
        (status = 404, description = "No metadata for this file ID", body = ErrorResponse),
        (status = 502, description = "Metadata backend failure", body = ErrorResponse)
    )
)]
pub async fn get_meta(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<VideoMetadata>, HttpAppError> {
    Ok(Json(state.retrieval.get_metadata(&id).await?))
}
