//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use clipvault_core::{BlobBackend, Config, MetadataBackend};

/// Validate critical configuration values
///
/// Runs `Config::validate` and logs warnings for settings that are legal but unusual.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();

    if is_production && config.blob_backend == BlobBackend::Memory {
        tracing::warn!(
            "In-memory blob backend selected in production - uploads will not survive a restart"
        );
    }

    if is_production && config.metadata_backend == MetadataBackend::Memory {
        tracing::warn!(
            "In-memory metadata backend selected in production - metadata will not survive a restart"
        );
    }

    if config.link_token.require_blob {
        tracing::info!("Metadata completion re-checks blob existence (LINK_TOKEN_REQUIRE_BLOB)");
    }

    if config.metadata_backend == MetadataBackend::Elasticsearch
        && config.elasticsearch.username.is_some()
        && config.elasticsearch.password.is_none()
    {
        tracing::warn!("ELASTICSEARCH_USERNAME is set without ELASTICSEARCH_PASSWORD");
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
