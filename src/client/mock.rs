//! Recording API double for component tests

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use super::{ClientError, PdfSearchApi};
use crate::types::{Page, SearchResult, SelectedFile, UploadReceipt};

/// A request the components made
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Upload(String),
    Document(String),
    Search(String),
}

/// Canned response for one endpoint
#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
    Ok(T),
    Reject(u16, String),
    Malformed,
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T, ClientError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Reject(status, detail) => Err(ClientError::Rejected { status, detail }),
            Reply::Malformed => Err(serde_json::from_str::<serde_json::Value>("<html>")
                .unwrap_err()
                .into()),
        }
    }
}

pub(crate) struct MockApi {
    calls: Mutex<Vec<Call>>,
    upload: Mutex<Reply<UploadReceipt>>,
    document: Mutex<Reply<Vec<Page>>>,
    search: Mutex<Reply<Vec<SearchResult>>>,
    document_gate: Mutex<Option<Arc<Notify>>>,
    /// Signalled whenever a document request starts
    pub document_started: Notify,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            upload: Mutex::new(Reply::Malformed),
            document: Mutex::new(Reply::Malformed),
            search: Mutex::new(Reply::Malformed),
            document_gate: Mutex::new(None),
            document_started: Notify::new(),
        }
    }

    pub fn uploads(self, reply: Reply<UploadReceipt>) -> Self {
        *self.upload.lock() = reply;
        self
    }

    pub fn documents(self, reply: Reply<Vec<Page>>) -> Self {
        *self.document.lock() = reply;
        self
    }

    pub fn searches(self, reply: Reply<Vec<SearchResult>>) -> Self {
        *self.search.lock() = reply;
        self
    }

    /// Hold every document response until the gate is notified
    pub fn gate_documents(self, gate: Arc<Notify>) -> Self {
        *self.document_gate.lock() = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PdfSearchApi for MockApi {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadReceipt, ClientError> {
        self.calls.lock().push(Call::Upload(file.name.clone()));
        self.upload.lock().clone().into_result()
    }

    async fn document(&self, filename: &str) -> Result<Vec<Page>, ClientError> {
        self.calls.lock().push(Call::Document(filename.to_string()));
        self.document_started.notify_one();

        let gate = self.document_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.document.lock().clone().into_result()
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ClientError> {
        self.calls.lock().push(Call::Search(query.to_string()));
        self.search.lock().clone().into_result()
    }
}

pub(crate) fn page(number: u32, content: &str) -> Page {
    Page {
        page_number: number,
        content: content.to_string(),
    }
}

pub(crate) fn hit(document: &str, number: u32, content: &str) -> SearchResult {
    SearchResult {
        document_name: document.to_string(),
        page_number: number,
        content: content.to_string(),
    }
}
