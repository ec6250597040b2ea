//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use clipvault_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clipvault API",
        version = "0.1.0",
        description = "Video ingestion and retrieval. Uploads happen in two phases: POST /upload/file stores the video and returns a metadata token, POST /upload/meta presents that token with a title."
    ),
    paths(
        handlers::upload::upload_file,
        handlers::meta::upload_meta,
        handlers::meta::get_meta,
        handlers::video::get_video,
        handlers::search::search,
        handlers::health::health_check,
    ),
    components(schemas(
        models::VideoMetadata,
        models::FileUploadResponse,
        models::UploadMetaRequest,
        handlers::upload::UploadFileForm,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "upload", description = "Two-phase video upload"),
        (name = "videos", description = "Video content, metadata and search"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// The OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
