//! Write-side and read-side operations over the blob store and the metadata index.

pub mod ingestion;
pub mod retrieval;

pub use ingestion::{IngestionCoordinator, UploadReceipt, UploadStage};
pub use retrieval::RetrievalService;
