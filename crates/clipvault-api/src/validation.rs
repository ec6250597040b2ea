//! Request validation for API handlers

use crate::constants::{MAX_SEARCH_QUERY_LENGTH, MAX_TITLE_LENGTH};
use clipvault_core::models::UploadMetaRequest;
use clipvault_core::AppError;

/// Check a metadata completion request and return the title to store (trimmed).
pub fn validate_upload_meta(request: &UploadMetaRequest) -> Result<String, AppError> {
    if request.meta_token.trim().is_empty() {
        return Err(AppError::InvalidInput("metaToken is required".to_string()));
    }

    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("title cannot be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "title cannot exceed {} characters",
            MAX_TITLE_LENGTH
        )));
    }

    Ok(title.to_string())
}

/// Check the `q` parameter of a title search and return it trimmed.
pub fn validate_search_query(query: Option<&str>) -> Result<String, AppError> {
    let query = query.map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Query parameter 'q' is required".to_string(),
        ));
    }
    if query.chars().count() > MAX_SEARCH_QUERY_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Query cannot exceed {} characters",
            MAX_SEARCH_QUERY_LENGTH
        )));
    }
    Ok(query.to_string())
}
