//! Backend API client
//!
//! Components reach the backend only through [`PdfSearchApi`], so they can be
//! driven by the reqwest-backed [`HttpClient`] or by a test double.

mod error;
mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use error::ClientError;
pub use http::HttpClient;

use async_trait::async_trait;

use crate::types::{Page, SearchResult, SelectedFile, UploadReceipt};

/// Operations the components need from the backend
#[async_trait]
pub trait PdfSearchApi: Send + Sync {
    /// POST the file as multipart field `file`
    async fn upload(&self, file: &SelectedFile) -> Result<UploadReceipt, ClientError>;

    /// GET every page of a document, in server order
    async fn document(&self, filename: &str) -> Result<Vec<Page>, ClientError>;

    /// GET pages matching a query, in server order
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ClientError>;
}
