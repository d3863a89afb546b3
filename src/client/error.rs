//! Client error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status and a detail message
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    /// Connection, protocol or request construction failure
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Detail of a backend rejection
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => Some(detail),
            _ => None,
        }
    }
}
