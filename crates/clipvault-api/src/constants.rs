//! API constants

/// Path of the served OpenAPI document
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Longest accepted video title, in characters
pub const MAX_TITLE_LENGTH: usize = 1024;

/// Longest accepted search query, in characters
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
