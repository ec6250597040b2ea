//! clipvault Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration, and the link
//! token codec shared by the blob store, the metadata index, and the HTTP API.

pub mod config;
pub mod error;
pub mod link_token;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, ElasticsearchConfig, LinkTokenConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use link_token::{LinkTokenCodec, LinkTokenError};
pub use models::VideoMetadata;
pub use storage_types::{BlobBackend, MetadataBackend};
