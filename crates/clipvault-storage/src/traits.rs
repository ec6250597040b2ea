//! Blob store abstraction trait
//!
//! This module defines the BlobStore trait that all blob backends must implement.

use async_trait::async_trait;
use clipvault_core::{AppError, BlobBackend};
use std::pin::Pin;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncSeek};

/// Blob store operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for blob store operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::WriteFailed(msg) => AppError::StorageWrite(msg),
            StorageError::NotFound(file_id) => {
                AppError::NotFound(format!("Video {} not found", file_id))
            }
            StorageError::ReadFailed(msg) => AppError::Internal(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Random-access reader over a stored blob.
pub trait BlobRead: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin> BlobRead for T {}

/// Byte source consumed by [`BlobStore::put`]. It may borrow from the request it is read from.
pub type UploadReader<'a> = Pin<Box<dyn AsyncRead + Send + Unpin + 'a>>;

/// Handle returned by [`BlobStore::get`]: the blob's length and a seekable reader.
pub struct BlobReader {
    pub content_length: u64,
    pub reader: Pin<Box<dyn BlobRead>>,
}

impl BlobReader {
    pub fn new(content_length: u64, reader: Pin<Box<dyn BlobRead>>) -> Self {
        Self {
            content_length,
            reader,
        }
    }
}

impl std::fmt::Debug for BlobReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobReader")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Blob store abstraction trait
///
/// Blobs are write-once. The store generates the file ID itself, so two writers can never
/// target the same ID, and an ID is only observable through `get` once its write has
/// completed.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Consume `reader` until EOF, store the bytes under a fresh file ID and return it.
    ///
    /// Content is copied incrementally; the payload is never required to fit in memory
    /// (the memory backend excepted). On failure nothing becomes visible.
    async fn put(&self, reader: UploadReader<'_>) -> StorageResult<String>;

    /// Open a stored blob for random-access reads.
    ///
    /// Unknown or syntactically invalid IDs fail with `StorageError::NotFound`.
    async fn get(&self, file_id: &str) -> StorageResult<BlobReader>;

    /// Check if a blob exists
    async fn exists(&self, file_id: &str) -> StorageResult<bool>;

    /// Get the blob backend type
    fn backend_type(&self) -> BlobBackend;
}
