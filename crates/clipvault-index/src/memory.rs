use async_trait::async_trait;
use clipvault_core::{MetadataBackend, VideoMetadata};
use dashmap::DashMap;
use futures::stream;
use std::sync::Arc;

use crate::traits::{IndexError, IndexResult, MetadataIndex, MetadataStream};

/// In-memory metadata index backed by a [`DashMap`].
///
/// Intended for development and tests. Search is a case-insensitive substring match on the
/// title, evaluated over a snapshot taken when the search starts.
#[derive(Clone, Default)]
pub struct MemoryMetadataIndex {
    records: Arc<DashMap<String, VideoMetadata>>,
}

impl MemoryMetadataIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl MetadataIndex for MemoryMetadataIndex {
    async fn ensure_schema(&self) -> IndexResult<()> {
        Ok(())
    }

    async fn put(&self, file_id: &str, title: &str) -> IndexResult<()> {
        self.records.insert(file_id.to_string(), VideoMetadata::new(file_id, title));
        Ok(())
    }

    async fn get_by_file_id(&self, file_id: &str) -> IndexResult<Option<VideoMetadata>> {
        Ok(self.records.get(file_id).map(|r| r.value().clone()))
    }

    async fn search_by_title(&self, query: &str) -> IndexResult<MetadataStream> {
        let needle = query.to_lowercase();
        let matches: Vec<VideoMetadata> = self
            .records
            .iter()
            .filter(|r| r.value().title.to_lowercase().contains(&needle))
            .map(|r| r.value().clone())
            .collect();

        Ok(Box::pin(stream::iter(matches.into_iter().map(Ok::<_, IndexError>))))
    }

    fn backend_type(&self) -> MetadataBackend {
        MetadataBackend::Memory
    }
}
