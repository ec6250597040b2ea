//! clipvault API library
//!
//! HTTP handlers, the ingestion coordinator and the read-side service, plus application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
mod telemetry;
mod utils;
mod validation;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use api_doc::{get_openapi_spec, ApiDoc};
pub use error::{ErrorResponse, HttpAppError};
pub use services::{IngestionCoordinator, RetrievalService, UploadReceipt, UploadStage};
pub use state::AppState;
