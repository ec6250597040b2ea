//! Clipvault Index Library
//!
//! This crate provides the searchable metadata store for clipvault: the `MetadataIndex`
//! trait and implementations backed by Elasticsearch (over its REST API) and by memory.

#[cfg(feature = "index-elasticsearch")]
pub mod elasticsearch;
pub mod factory;
#[cfg(feature = "index-memory")]
pub mod memory;
pub mod traits;

pub use clipvault_core::MetadataBackend;
#[cfg(feature = "index-elasticsearch")]
pub use elasticsearch::ElasticsearchMetadataIndex;
pub use factory::create_metadata_index;
#[cfg(feature = "index-memory")]
pub use memory::MemoryMetadataIndex;
pub use traits::{IndexError, IndexResult, MetadataIndex, MetadataStream};
