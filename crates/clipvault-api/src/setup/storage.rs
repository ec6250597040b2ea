//! Blob store and metadata index setup

use anyhow::{Context, Result};
use clipvault_core::Config;
use clipvault_index::{create_metadata_index, MetadataIndex};
use clipvault_storage::{create_blob_store, BlobStore};
use std::sync::Arc;

pub async fn setup_blob_store(config: &Config) -> Result<Arc<dyn BlobStore>> {
    tracing::info!("Initializing blob store...");
    let blob_store = create_blob_store(config)
        .await
        .context("Failed to initialize blob store")?;
    tracing::info!(
        backend = %blob_store.backend_type(),
        path = %config.blob_storage_path,
        "Blob store initialized successfully"
    );
    Ok(blob_store)
}

/// Create the metadata index and ensure its schema exists.
pub async fn setup_metadata_index(config: &Config) -> Result<Arc<dyn MetadataIndex>> {
    tracing::info!("Initializing metadata index...");
    let index = create_metadata_index(config)
        .await
        .context("Failed to initialize metadata index")?;
    tracing::info!(
        backend = %index.backend_type(),
        index = %config.elasticsearch.index,
        "Metadata index initialized successfully"
    );
    Ok(index)
}
