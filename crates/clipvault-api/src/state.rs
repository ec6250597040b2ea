//! Application state shared by all handlers.

use crate::services::{IngestionCoordinator, RetrievalService};
use clipvault_core::{Config, LinkTokenCodec};
use clipvault_index::MetadataIndex;
use clipvault_storage::BlobStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub blob_store: Arc<dyn BlobStore>,
    pub metadata_index: Arc<dyn MetadataIndex>,
    pub ingestion: IngestionCoordinator,
    pub retrieval: RetrievalService,
}

impl AppState {
    /// Wire the coordinator and the read side over the two stores selected at startup.
    pub fn new(
        config: &Config,
        blob_store: Arc<dyn BlobStore>,
        metadata_index: Arc<dyn MetadataIndex>,
    ) -> Self {
        let codec = LinkTokenCodec::from_config(&config.link_token);
        let ingestion =
            IngestionCoordinator::new(blob_store.clone(), metadata_index.clone(), codec)
                .with_blob_check(config.link_token.require_blob);
        let retrieval = RetrievalService::new(
            blob_store.clone(),
            metadata_index.clone(),
            config.search_max_results,
        );

        Self {
            blob_store,
            metadata_index,
            ingestion,
            retrieval,
        }
    }
}
