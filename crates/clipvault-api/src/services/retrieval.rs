//! Read side: blobs by ID, metadata by ID, metadata by title.

use clipvault_core::{AppError, VideoMetadata};
use clipvault_index::{MetadataIndex, MetadataStream};
use clipvault_storage::{BlobReader, BlobStore};
use futures::{StreamExt, TryStreamExt};
use std::sync::Arc;

#[derive(Clone)]
pub struct RetrievalService {
    blob_store: Arc<dyn BlobStore>,
    metadata_index: Arc<dyn MetadataIndex>,
    max_search_results: usize,
}

impl RetrievalService {
    pub fn new(
        blob_store: Arc<dyn BlobStore>,
        metadata_index: Arc<dyn MetadataIndex>,
        max_search_results: usize,
    ) -> Self {
        Self {
            blob_store,
            metadata_index,
            max_search_results,
        }
    }

    /// Open a stored video for random-access reads.
    pub async fn open_video(&self, file_id: &str) -> Result<BlobReader, AppError> {
        Ok(self.blob_store.get(file_id).await?)
    }

    /// Metadata for `file_id`. A missing record is `NotFound`; a backend failure is
    /// `IndexQuery`.
    pub async fn get_metadata(&self, file_id: &str) -> Result<VideoMetadata, AppError> {
        self.metadata_index
            .get_by_file_id(file_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Metadata for video {} not found", file_id)))
    }

    /// Lazy title search, unbounded.
    pub async fn search_stream(&self, query: &str) -> Result<MetadataStream, AppError> {
        Ok(self.metadata_index.search_by_title(query).await?)
    }

    /// Drain at most `max_search_results` matches. An empty result is not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<VideoMetadata>, AppError> {
        let start = std::time::Instant::now();
        let results: Vec<VideoMetadata> = self
            .search_stream(query)
            .await?
            .take(self.max_search_results)
            .try_collect()
            .await?;

        tracing::debug!(
            query = %query,
            result_count = results.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Title search completed"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clipvault_core::{ErrorMetadata, MetadataBackend};
    use clipvault_index::{IndexError, IndexResult, MemoryMetadataIndex};
    use clipvault_storage::MemoryBlobStore;
    use std::io::Cursor;
    use tokio::io::AsyncReadExt;

    /// Index whose reads fail; search yields one record and then a query error.
    struct FailingIndex;

    #[async_trait]
    impl MetadataIndex for FailingIndex {
        async fn ensure_schema(&self) -> IndexResult<()> {
            Ok(())
        }

        async fn put(&self, _file_id: &str, _title: &str) -> IndexResult<()> {
            Ok(())
        }

        async fn get_by_file_id(&self, _file_id: &str) -> IndexResult<Option<VideoMetadata>> {
            Err(IndexError::Query("connection refused".to_string()))
        }

        async fn search_by_title(&self, _query: &str) -> IndexResult<MetadataStream> {
            Ok(Box::pin(futures::stream::iter(vec![
                Ok(VideoMetadata::new("f1", "zoo")),
                Err(IndexError::Query("page 2 timed out".to_string())),
            ])))
        }

        fn backend_type(&self) -> MetadataBackend {
            MetadataBackend::Elasticsearch
        }
    }

    fn service(max: usize) -> (RetrievalService, Arc<MemoryBlobStore>, Arc<MemoryMetadataIndex>) {
        let blobs = Arc::new(MemoryBlobStore::new());
        let index = Arc::new(MemoryMetadataIndex::new());
        (
            RetrievalService::new(blobs.clone(), index.clone(), max),
            blobs,
            index,
        )
    }

    #[tokio::test]
    async fn test_open_video_streams_stored_bytes() {
        let (service, blobs, _) = service(10);
        let file_id = blobs
            .put(Box::pin(Cursor::new(b"frames".to_vec())))
            .await
            .unwrap();

        let mut blob = service.open_video(&file_id).await.unwrap();
        let mut out = Vec::new();
        blob.reader.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"frames");
    }

    #[tokio::test]
    async fn test_missing_video_and_metadata_are_not_found() {
        let (service, _, _) = service(10);
        assert!(matches!(
            service.open_video("nonexistent-id").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_metadata("nonexistent-id").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_search_is_capped_and_empty_is_ok() {
        let (service, _, index) = service(2);
        for i in 0..5 {
            index.put(&format!("f{i}"), &format!("zoo {i}")).await.unwrap();
        }

        assert_eq!(service.search("zoo").await.unwrap().len(), 2);
        assert!(service.search("beach").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_index_failures_are_query_errors_not_empty_results() {
        let service =
            RetrievalService::new(Arc::new(MemoryBlobStore::new()), Arc::new(FailingIndex), 10);

        let err = service.get_metadata("f1").await.unwrap_err();
        assert!(matches!(err, AppError::IndexQuery(_)));
        assert_eq!(err.http_status_code(), 502);

        let err = service.search("zoo").await.unwrap_err();
        assert!(matches!(err, AppError::IndexQuery(_)));
        assert_eq!(err.http_status_code(), 502);
    }

    #[tokio::test]
    async fn test_search_cap_stops_before_a_later_failure() {
        let service =
            RetrievalService::new(Arc::new(MemoryBlobStore::new()), Arc::new(FailingIndex), 1);
        let results = service.search("zoo").await.unwrap();
        assert_eq!(results, vec![VideoMetadata::new("f1", "zoo")]);
    }
}
