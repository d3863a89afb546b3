//! Route modules for the PDF Search server
//!
//! Endpoints:
//! - POST /upload/ - Upload a PDF as multipart field `file`
//! - GET /document/:filename - All pages of a document
//! - GET /search/:query - Pages matching a query

pub mod documents;
pub mod search;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let body_limit = state.config().upload.max_bytes;

    Router::new()
        .merge(upload::router())
        .merge(documents::router())
        .merge(search::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
