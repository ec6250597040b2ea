#[cfg(feature = "index-elasticsearch")]
use crate::ElasticsearchMetadataIndex;
#[cfg(feature = "index-memory")]
use crate::MemoryMetadataIndex;
use crate::{IndexError, IndexResult, MetadataBackend, MetadataIndex};
use clipvault_core::Config;
use std::sync::Arc;

/// Create the metadata index selected by configuration and make sure its schema exists.
pub async fn create_metadata_index(config: &Config) -> IndexResult<Arc<dyn MetadataIndex>> {
    let index: Arc<dyn MetadataIndex> = match config.metadata_backend {
        #[cfg(feature = "index-elasticsearch")]
        MetadataBackend::Elasticsearch => {
            Arc::new(ElasticsearchMetadataIndex::new(&config.elasticsearch)?)
        }

        #[cfg(not(feature = "index-elasticsearch"))]
        MetadataBackend::Elasticsearch => {
            return Err(IndexError::Config(
                "Elasticsearch backend not available (index-elasticsearch feature not enabled)"
                    .to_string(),
            ))
        }

        #[cfg(feature = "index-memory")]
        MetadataBackend::Memory => {
            tracing::warn!("Using in-memory metadata index; records are lost on restart");
            Arc::new(MemoryMetadataIndex::new())
        }

        #[cfg(not(feature = "index-memory"))]
        MetadataBackend::Memory => {
            return Err(IndexError::Config(
                "Memory index backend not available (index-memory feature not enabled)"
                    .to_string(),
            ))
        }
    };

    index.ensure_schema().await?;
    Ok(index)
}
