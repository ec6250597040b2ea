use crate::keys;
use crate::traits::{BlobReader, BlobStore, StorageError, StorageResult, UploadReader};
use async_trait::async_trait;
use clipvault_core::BlobBackend;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directory under the storage root holding in-flight writes.
const STAGING_DIR: &str = ".staging";

/// Local filesystem blob store
///
/// Each blob is a single file named by its file ID directly under the storage root.
/// Writes go to a temporary file in `<root>/.staging` and are renamed into place only after
/// the content has been fully copied and synced, so a blob is visible either completely or
/// not at all.
#[derive(Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
    staging_path: PathBuf,
}

impl LocalBlobStore {
    /// Create a new LocalBlobStore rooted at `base_path`, creating the directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        let staging_path = base_path.join(STAGING_DIR);

        fs::create_dir_all(&staging_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                staging_path.display(),
                e
            ))
        })?;

        Ok(LocalBlobStore {
            base_path,
            staging_path,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a file ID to its path. Anything but a canonical file ID resolves to nothing.
    fn blob_path(&self, file_id: &str) -> Option<PathBuf> {
        keys::canonical_file_id(file_id).map(|id| self.base_path.join(id))
    }
}

fn sync_dir(path: &Path) -> std::io::Result<()> {
    std::fs::File::open(path)?.sync_all()
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, mut reader: UploadReader<'_>) -> StorageResult<String> {
        let file_id = keys::new_file_id();
        let path = self.base_path.join(&file_id);
        let start = std::time::Instant::now();

        let staging_path = self.staging_path.clone();
        let staged = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix("upload-")
                .suffix(".part")
                .tempfile_in(staging_path)
        })
        .await
        .map_err(|e| StorageError::WriteFailed(format!("Staging task failed: {}", e)))?
        .map_err(|e| StorageError::WriteFailed(format!("Failed to create staging file: {}", e)))?;

        // The staged file is removed when `staged` drops, including when this future is
        // cancelled before the rename below.
        let handle = staged.as_file().try_clone().map_err(|e| {
            StorageError::WriteFailed(format!("Failed to open staging file: {}", e))
        })?;
        let mut file = fs::File::from_std(handle);

        let bytes_copied = tokio::io::copy(&mut reader, &mut file).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to write stream to {}: {}",
                staged.path().display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to sync {}: {}",
                staged.path().display(),
                e
            ))
        })?;
        drop(file);

        let final_path = path.clone();
        let base_path = self.base_path.clone();
        tokio::task::spawn_blocking(move || -> StorageResult<()> {
            staged.persist_noclobber(&final_path).map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to move blob into {}: {}",
                    final_path.display(),
                    e
                ))
            })?;
            if let Err(e) = sync_dir(&base_path) {
                tracing::warn!(
                    path = %base_path.display(),
                    error = %e,
                    "Failed to sync storage directory after rename"
                );
            }
            Ok(())
        })
        .await
        .map_err(|e| StorageError::WriteFailed(format!("Rename task failed: {}", e)))??;

        tracing::info!(
            path = %path.display(),
            file_id = %file_id,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local blob write successful"
        );

        Ok(file_id)
    }

    async fn get(&self, file_id: &str) -> StorageResult<BlobReader> {
        let path = self
            .blob_path(file_id)
            .ok_or_else(|| StorageError::NotFound(file_id.to_string()))?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(file_id.to_string()));
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to open {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let content_length = file
            .metadata()
            .await
            .map_err(|e| {
                StorageError::ReadFailed(format!("Failed to stat {}: {}", path.display(), e))
            })?
            .len();

        tracing::debug!(
            path = %path.display(),
            file_id = %file_id,
            size_bytes = content_length,
            "Local blob opened"
        );

        Ok(BlobReader::new(content_length, Box::pin(file)))
    }

    async fn exists(&self, file_id: &str) -> StorageResult<bool> {
        match self.blob_path(file_id) {
            Some(path) => Ok(fs::try_exists(&path).await?),
            None => Ok(false),
        }
    }

    fn backend_type(&self) -> BlobBackend {
        BlobBackend::Local
    }
}
