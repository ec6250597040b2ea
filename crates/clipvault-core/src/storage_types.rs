use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Blob store backend types
///
/// Selected once at startup; handlers only ever see the `BlobStore` trait object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    Local,
    Memory,
}

impl FromStr for BlobBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(BlobBackend::Local),
            "memory" => Ok(BlobBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid blob backend: {}", s)),
        }
    }
}

impl Display for BlobBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BlobBackend::Local => write!(f, "local"),
            BlobBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Metadata index backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataBackend {
    Elasticsearch,
    Memory,
}

impl FromStr for MetadataBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elasticsearch" | "es" => Ok(MetadataBackend::Elasticsearch),
            "memory" => Ok(MetadataBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid metadata backend: {}", s)),
        }
    }
}

impl Display for MetadataBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MetadataBackend::Elasticsearch => write!(f, "elasticsearch"),
            MetadataBackend::Memory => write!(f, "memory"),
        }
    }
}
