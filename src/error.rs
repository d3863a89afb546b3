//! Error types for the PDF Search server

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::extract::ExtractError;
use crate::store::StoreError;
use crate::types::ErrorBody;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, ApiError>;

/// Application error type
///
/// Every variant is answered with a `{"detail": ...}` body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Error processing PDF: {0}")]
    Processing(#[from] ExtractError),

    #[error("Error indexing PDF: {0}")]
    Index(#[from] StoreError),

    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Multipart(e) => e.status(),
            Self::Processing(_) | Self::Index(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
