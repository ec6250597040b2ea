//! Configuration module
//!
//! This module provides the process-wide configuration: listen port, link token signing
//! settings, blob storage location, and metadata backend endpoint. Everything is read once
//! at startup and passed explicitly to the components that need it.

use std::env;
use std::str::FromStr;

use crate::storage_types::{BlobBackend, MetadataBackend};

// Common constants
const SERVER_PORT: u16 = 8080;
const NOT_BEFORE_SKEW_SECS: i64 = 60;
const MAX_UPLOAD_SIZE_MB: usize = 500;
const SEARCH_MAX_RESULTS: usize = 100;
const BLOB_STORAGE_PATH: &str = "videos";
const ELASTICSEARCH_URL: &str = "http://localhost:9200";
const ELASTICSEARCH_INDEX: &str = "video_meta";
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Link token signing settings
#[derive(Clone, Debug)]
pub struct LinkTokenConfig {
    pub secret: String,
    /// How far before issuance the `nbf` claim is placed, to tolerate clock skew.
    pub not_before_skew_secs: i64,
    /// Re-check blob existence before accepting metadata for a verified token.
    pub require_blob: bool,
}

/// Metadata backend connection settings
#[derive(Clone, Debug)]
pub struct ElasticsearchConfig {
    pub url: String,
    pub index: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub link_token: LinkTokenConfig,
    pub blob_backend: BlobBackend,
    pub blob_storage_path: String,
    pub metadata_backend: MetadataBackend,
    pub elasticsearch: ElasticsearchConfig,
    pub max_upload_size_bytes: usize,
    pub search_max_results: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let link_token = LinkTokenConfig {
            secret: env::var("LINK_TOKEN_SECRET").map_err(|_| {
                anyhow::anyhow!("LINK_TOKEN_SECRET must be set for metadata token signing")
            })?,
            not_before_skew_secs: env::var("LINK_TOKEN_NOT_BEFORE_SKEW_SECS")
                .unwrap_or_else(|_| NOT_BEFORE_SKEW_SECS.to_string())
                .parse()
                .map_err(|_| {
                    anyhow::anyhow!("LINK_TOKEN_NOT_BEFORE_SKEW_SECS must be a number of seconds")
                })?,
            require_blob: parse_bool(env::var("LINK_TOKEN_REQUIRE_BLOB").ok(), false),
        };

        let blob_backend = match env::var("BLOB_BACKEND") {
            Ok(value) => BlobBackend::from_str(&value)?,
            Err(_) => BlobBackend::Local,
        };

        let metadata_backend = match env::var("METADATA_BACKEND") {
            Ok(value) => MetadataBackend::from_str(&value)?,
            Err(_) => MetadataBackend::Elasticsearch,
        };

        let elasticsearch = ElasticsearchConfig {
            url: env::var("ELASTICSEARCH_URL").unwrap_or_else(|_| ELASTICSEARCH_URL.to_string()),
            index: env::var("ELASTICSEARCH_INDEX")
                .unwrap_or_else(|_| ELASTICSEARCH_INDEX.to_string()),
            username: env::var("ELASTICSEARCH_USERNAME").ok(),
            password: env::var("ELASTICSEARCH_PASSWORD").ok(),
        };

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);
        let max_upload_size_bytes = upload_size_bytes(max_upload_size_mb)?;

        Ok(Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            link_token,
            blob_backend,
            blob_storage_path: env::var("BLOB_STORAGE_PATH")
                .unwrap_or_else(|_| BLOB_STORAGE_PATH.to_string()),
            metadata_backend,
            elasticsearch,
            max_upload_size_bytes,
            search_max_results: env::var("SEARCH_MAX_RESULTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(SEARCH_MAX_RESULTS),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.link_token.secret.is_empty() {
            return Err(anyhow::anyhow!(
                "LINK_TOKEN_SECRET cannot be empty - set LINK_TOKEN_SECRET environment variable"
            ));
        }

        if self.is_production() && self.link_token.secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "LINK_TOKEN_SECRET must be at least {} characters long in production",
                MIN_PRODUCTION_SECRET_LEN
            ));
        }

        if self.link_token.not_before_skew_secs < 0 {
            return Err(anyhow::anyhow!(
                "LINK_TOKEN_NOT_BEFORE_SKEW_SECS cannot be negative"
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.blob_backend == BlobBackend::Local && self.blob_storage_path.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "BLOB_STORAGE_PATH must be set when using local blob backend"
            ));
        }

        if self.metadata_backend == MetadataBackend::Elasticsearch
            && !(self.elasticsearch.url.starts_with("http://")
                || self.elasticsearch.url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "ELASTICSEARCH_URL must be an http(s) URL when using elasticsearch metadata backend"
            ));
        }

        if self.elasticsearch.index.is_empty()
            || self.elasticsearch.index != self.elasticsearch.index.to_lowercase()
        {
            return Err(anyhow::anyhow!(
                "ELASTICSEARCH_INDEX must be a non-empty lowercase name"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("Max upload size cannot be 0"));
        }

        if self.search_max_results == 0 {
            return Err(anyhow::anyhow!("SEARCH_MAX_RESULTS cannot be 0"));
        }

        Ok(())
    }
}

fn upload_size_bytes(megabytes: usize) -> Result<usize, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large: {}", megabytes))
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}
