#[cfg(feature = "storage-local")]
use crate::LocalBlobStore;
#[cfg(feature = "storage-memory")]
use crate::MemoryBlobStore;
use crate::{BlobBackend, BlobStore, StorageError, StorageResult};
use clipvault_core::Config;
use std::sync::Arc;

/// Create a blob store based on configuration
pub async fn create_blob_store(config: &Config) -> StorageResult<Arc<dyn BlobStore>> {
    match config.blob_backend {
        #[cfg(feature = "storage-local")]
        BlobBackend::Local => {
            if config.blob_storage_path.trim().is_empty() {
                return Err(StorageError::ConfigError(
                    "BLOB_STORAGE_PATH not configured".to_string(),
                ));
            }

            let store = LocalBlobStore::new(&config.blob_storage_path).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        BlobBackend::Local => Err(StorageError::ConfigError(
            "Local blob backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        BlobBackend::Memory => {
            tracing::warn!("Using in-memory blob store; uploaded content is lost on restart");
            Ok(Arc::new(MemoryBlobStore::new()))
        }

        #[cfg(not(feature = "storage-memory"))]
        BlobBackend::Memory => Err(StorageError::ConfigError(
            "Memory blob backend not available (storage-memory feature not enabled)".to_string(),
        )),
    }
}
