use crate::keys;
use crate::traits::{BlobReader, BlobStore, StorageError, StorageResult, UploadReader};
use async_trait::async_trait;
use bytes::Bytes;
use clipvault_core::BlobBackend;
use dashmap::DashMap;
use std::io::Cursor;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// In-memory blob store for tests and local development.
///
/// Content is buffered whole before it is inserted, so a blob is only visible once the
/// reader has been fully consumed.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<DashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, mut reader: UploadReader<'_>) -> StorageResult<String> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to read upload: {}", e)))?;

        let file_id = keys::new_file_id();
        let size = data.len();
        self.blobs.insert(file_id.clone(), Bytes::from(data));

        tracing::debug!(file_id = %file_id, size_bytes = size, "Memory blob write successful");
        Ok(file_id)
    }

    async fn get(&self, file_id: &str) -> StorageResult<BlobReader> {
        let data = self
            .blobs
            .get(file_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::NotFound(file_id.to_string()))?;

        Ok(BlobReader::new(
            data.len() as u64,
            Box::pin(Cursor::new(data)),
        ))
    }

    async fn exists(&self, file_id: &str) -> StorageResult<bool> {
        Ok(self.blobs.contains_key(file_id))
    }

    fn backend_type(&self) -> BlobBackend {
        BlobBackend::Memory
    }
}
