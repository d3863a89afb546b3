//! Search API routes

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::state::AppState;
use crate::types::SearchResult;

/// Create the search router
pub fn router() -> Router<AppState> {
    Router::new().route("/search/:query", get(search_pages))
}

/// GET /search/:query
///
/// Matching pages across all documents, best first.
async fn search_pages(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<SearchResult>>> {
    let results = state.store().search(&query).await?;
    tracing::debug!(query = %query, results = results.len(), "Search");
    Ok(Json(results))
}
