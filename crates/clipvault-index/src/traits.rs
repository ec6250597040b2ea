//! Metadata index abstraction trait

use async_trait::async_trait;
use clipvault_core::{AppError, MetadataBackend, VideoMetadata};
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Metadata index operation errors
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Index write failed: {0}")]
    Write(String),

    #[error("Index query failed: {0}")]
    Query(String),

    #[error("Index schema setup failed: {0}")]
    Schema(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for metadata index operations
pub type IndexResult<T> = Result<T, IndexError>;

impl From<IndexError> for AppError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Write(msg) => AppError::IndexWrite(msg),
            IndexError::Query(msg) => AppError::IndexQuery(msg),
            IndexError::Schema(msg) => AppError::Internal(format!("Index schema: {}", msg)),
            IndexError::Config(msg) => AppError::Internal(msg),
        }
    }
}

/// Lazy, finite sequence of search hits. A backend failure while paging is yielded as an
/// `IndexError::Query` item.
pub type MetadataStream = Pin<Box<dyn Stream<Item = IndexResult<VideoMetadata>> + Send>>;

/// Searchable store of `{title, fileId}` records keyed by file ID.
#[async_trait]
pub trait MetadataIndex: Send + Sync {
    /// Create the backing index with its field schema if it is absent. Idempotent.
    async fn ensure_schema(&self) -> IndexResult<()>;

    /// Upsert the record for `file_id`.
    async fn put(&self, file_id: &str, title: &str) -> IndexResult<()>;

    /// Point lookup. A missing record is `Ok(None)`; only backend failures are errors.
    async fn get_by_file_id(&self, file_id: &str) -> IndexResult<Option<VideoMetadata>>;

    /// Records whose title matches `query` as a keyword or case-insensitive substring.
    /// Ordering is backend-defined.
    async fn search_by_title(&self, query: &str) -> IndexResult<MetadataStream>;

    fn backend_type(&self) -> MetadataBackend;
}
