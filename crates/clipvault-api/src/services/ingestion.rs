//! Two-phase upload: store the bytes, then record the metadata.
//!
//! Phase 1 writes the blob and hands back a signed link token carrying the new file ID.
//! Phase 2 presents that token with a title; the token is verified and the metadata is
//! upserted. The two stores share no transaction. A phase 2 failure at the index leaves the
//! blob in place without metadata; nothing here deletes it.

use chrono::{DateTime, Utc};
use clipvault_core::{AppError, LinkTokenCodec, VideoMetadata};
use clipvault_index::MetadataIndex;
use clipvault_storage::{BlobStore, UploadReader};
use std::fmt;
use std::sync::Arc;

/// Stages an upload moves through. Only used for logging; nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Received,
    BlobStored,
    TokenIssued,
    MetadataPending,
    Completed,
    Abandoned,
}

impl UploadStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStage::Received => "received",
            UploadStage::BlobStored => "blob_stored",
            UploadStage::TokenIssued => "token_issued",
            UploadStage::MetadataPending => "metadata_pending",
            UploadStage::Completed => "completed",
            UploadStage::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of phase 1.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub file_id: String,
    pub token: String,
}

#[derive(Clone)]
pub struct IngestionCoordinator {
    blob_store: Arc<dyn BlobStore>,
    metadata_index: Arc<dyn MetadataIndex>,
    codec: LinkTokenCodec,
    require_blob: bool,
}

impl IngestionCoordinator {
    pub fn new(
        blob_store: Arc<dyn BlobStore>,
        metadata_index: Arc<dyn MetadataIndex>,
        codec: LinkTokenCodec,
    ) -> Self {
        Self {
            blob_store,
            metadata_index,
            codec,
            require_blob: false,
        }
    }

    /// Make phase 2 fail with NotFound when the token's blob no longer exists.
    pub fn with_blob_check(mut self, require_blob: bool) -> Self {
        self.require_blob = require_blob;
        self
    }

    pub async fn begin_upload(&self, reader: UploadReader<'_>) -> Result<UploadReceipt, AppError> {
        self.begin_upload_at(reader, Utc::now()).await
    }

    /// Phase 1: store the bytes and mint a token for the new file ID.
    ///
    /// A failed write issues no token and touches no metadata.
    pub async fn begin_upload_at(
        &self,
        reader: UploadReader<'_>,
        now: DateTime<Utc>,
    ) -> Result<UploadReceipt, AppError> {
        tracing::debug!(stage = %UploadStage::Received, "Upload received");

        let file_id = self.blob_store.put(reader).await.map_err(|e| {
            tracing::warn!(error = %e, "Blob write failed, upload aborted");
            AppError::from(e)
        })?;
        tracing::debug!(stage = %UploadStage::BlobStored, file_id = %file_id, "Blob stored");

        let token = self.codec.mint(&file_id, now)?;
        tracing::info!(
            stage = %UploadStage::TokenIssued,
            file_id = %file_id,
            "Upload stored, metadata token issued"
        );

        Ok(UploadReceipt { file_id, token })
    }

    pub async fn complete_upload(
        &self,
        token: &str,
        title: &str,
    ) -> Result<VideoMetadata, AppError> {
        self.complete_upload_at(token, title, Utc::now()).await
    }

    /// Phase 2: verify the token and upsert `{title, fileId}`.
    ///
    /// Replaying a valid token overwrites the earlier title.
    pub async fn complete_upload_at(
        &self,
        token: &str,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<VideoMetadata, AppError> {
        let file_id = self.codec.verify(token, now).map_err(|e| {
            tracing::warn!(error = %e, "Metadata token rejected");
            AppError::from(e)
        })?;

        if self.require_blob && !self.blob_store.exists(&file_id).await? {
            tracing::warn!(file_id = %file_id, "Token references a blob that does not exist");
            return Err(AppError::NotFound(format!("Video {} not found", file_id)));
        }

        tracing::debug!(
            stage = %UploadStage::MetadataPending,
            file_id = %file_id,
            "Writing metadata"
        );

        if let Err(e) = self.metadata_index.put(&file_id, title).await {
            tracing::warn!(
                stage = %UploadStage::Abandoned,
                file_id = %file_id,
                error = %e,
                "Metadata write failed; blob kept without metadata"
            );
            return Err(e.into());
        }

        tracing::info!(stage = %UploadStage::Completed, file_id = %file_id, "Upload completed");
        Ok(VideoMetadata::new(file_id, title))
    }
}
