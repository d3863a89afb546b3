//! reqwest implementation of [`PdfSearchApi`]

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use super::{ClientError, PdfSearchApi};
use crate::types::{ErrorBody, Page, SearchResult, SelectedFile, UploadReceipt, PDF_MIME_TYPE};

/// HTTP client for the upload, document and search endpoints
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client for a backend such as `http://localhost:8000`
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl PdfSearchApi for HttpClient {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadReceipt, ClientError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(PDF_MIME_TYPE)?;
        let form = Form::new().part("file", part);

        tracing::debug!(file_name = %file.name, size = file.bytes.len(), "POST /upload/");

        let response = self
            .http
            .post(self.endpoint("/upload/"))
            .multipart(form)
            .send()
            .await?;

        decode(response).await
    }

    async fn document(&self, filename: &str) -> Result<Vec<Page>, ClientError> {
        let path = format!("/document/{}", filename);
        tracing::debug!(path = %path, "GET document");

        let response = self.http.get(self.endpoint(&path)).send().await?;
        decode(response).await
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ClientError> {
        let path = format!("/search/{}", urlencoding::encode(query));
        tracing::debug!(path = %path, "GET search");

        let response = self.http.get(self.endpoint(&path)).send().await?;
        decode(response).await
    }
}

/// Decode a JSON body, turning non-success statuses into rejections
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;

    if status.is_success() {
        return Ok(serde_json::from_slice(&body)?);
    }

    let error: ErrorBody = serde_json::from_slice(&body)?;
    Err(rejection(status, error))
}

fn rejection(status: StatusCode, error: ErrorBody) -> ClientError {
    let detail = error.detail_text();
    tracing::warn!(status = status.as_u16(), detail = %detail, "Backend rejected request");
    ClientError::Rejected {
        status: status.as_u16(),
        detail,
    }
}
