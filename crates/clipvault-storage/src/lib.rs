//! Clipvault Storage Library
//!
//! This crate provides the blob store abstraction for clipvault: the `BlobStore` trait and
//! implementations for the local filesystem and for memory.
//!
//! # File IDs
//!
//! File IDs are generated by the store on write, never by callers. They are random UUIDs in
//! lowercase hyphenated form; generation and validation live in the `keys` module so all
//! backends agree on what a valid ID is.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use clipvault_core::BlobBackend;
pub use factory::create_blob_store;
#[cfg(feature = "storage-local")]
pub use local::LocalBlobStore;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryBlobStore;
pub use traits::{BlobRead, BlobReader, BlobStore, StorageError, StorageResult, UploadReader};
