use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::validation::validate_search_query;
use axum::extract::{Query, State};
use axum::Json;
use clipvault_core::VideoMetadata;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Title keyword or substring
    pub q: Option<String>,
}

/// Search video metadata by title. Result order is backend-defined.
#[utoipa::path(
    get,
    path = "/search",
    tag = "videos",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching records, possibly empty", body = [VideoMetadata]),
        (status = 400, description = "Missing query", body = ErrorResponse),
        (status = 502, description = "Metadata backend failure", body = ErrorResponse)
    )
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<VideoMetadata>>, HttpAppError> {
    let query = validate_search_query(params.q.as_deref())?;
    Ok(Json(state.retrieval.search(&query).await?))
}
