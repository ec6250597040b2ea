use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Searchable metadata for an uploaded video.
///
/// `file_id` references a blob written by the blob store before this record was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub title: String,
    pub file_id: String,
}

impl VideoMetadata {
    pub fn new(file_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file_id: file_id.into(),
        }
    }
}

/// Response for a completed phase 1 upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadResponse {
    pub id: String,
    pub meta_token: String,
}

/// Request body for phase 2 (metadata completion)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetaRequest {
    pub meta_token: String,
    pub title: String,
}
