//! Document API endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::state::AppState;
use crate::types::Page;

/// Create the documents router
pub fn router() -> Router<AppState> {
    Router::new().route("/document/:filename", get(get_document_pages))
}

/// GET /document/:filename
///
/// Pages in page order. Unknown documents yield an empty list.
async fn get_document_pages(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Json<Vec<Page>> {
    let pages = state.store().document(&filename).await;
    tracing::debug!(filename = %filename, pages = pages.len(), "Document lookup");
    Json(pages)
}
