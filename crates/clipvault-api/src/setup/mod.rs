//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use clipvault_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let blob_store = storage::setup_blob_store(&config).await?;
    let metadata_index = storage::setup_metadata_index(&config).await?;

    let state = Arc::new(AppState::new(&config, blob_store, metadata_index));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
