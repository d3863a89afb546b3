//! Upload Routes
//!
//! POST /upload/ accepts a multipart body whose `file` field carries the PDF.
//! The text of every page is extracted and indexed under the file's name.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::UploadReceipt;

/// Create the upload router
pub fn router() -> Router<AppState> {
    Router::new().route("/upload/", post(upload_pdf))
}

/// POST /upload/
async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadReceipt>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            tracing::debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if !filename.ends_with(".pdf") {
            return Err(ApiError::BadRequest("File must be a PDF".to_string()));
        }

        let data = field.bytes().await?;
        tracing::debug!(filename = %filename, size = data.len(), "Received upload");

        let extractor = state.extractor();
        let texts = tokio::task::spawn_blocking(move || extractor.extract_pages(&data))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;

        let pages_processed = state.store().replace_document(&filename, texts).await?;

        tracing::info!(filename = %filename, pages_processed, "PDF uploaded");

        return Ok(Json(UploadReceipt {
            message: "PDF uploaded successfully".to_string(),
            filename,
            pages_processed,
        }));
    }

    Err(ApiError::BadRequest(
        "No file provided. Use field name 'file'".to_string(),
    ))
}
