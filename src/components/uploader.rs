//! Uploader component
//!
//! Holds the selected file and a one-line status, submits the file to the
//! backend and announces successful uploads.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::client::{ClientError, PdfSearchApi};
use crate::notify::{NotificationBus, PdfUploaded};
use crate::types::SelectedFile;

/// Status line shown under the upload control
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    /// Submit was pressed with nothing selected; no request was made
    NoFileSelected,
    Uploading { filename: String },
    Uploaded { filename: String, pages_processed: u32 },
    /// The backend refused the upload
    Rejected { detail: String },
    /// The request or its response failed
    Failed { message: String },
}

impl UploadStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Failed { .. })
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::NoFileSelected => write!(f, "Please select a file first"),
            Self::Uploading { filename } => write!(f, "Uploading {}...", filename),
            Self::Uploaded { pages_processed, .. } => {
                write!(f, "Success: {} pages processed", pages_processed)
            }
            Self::Rejected { detail } => write!(f, "Error: {}", detail),
            Self::Failed { message } => write!(f, "Error: {}", message),
        }
    }
}

/// File upload component
#[derive(Clone)]
pub struct Uploader {
    inner: Arc<UploaderInner>,
}

struct UploaderInner {
    api: Arc<dyn PdfSearchApi>,
    bus: NotificationBus,
    selected: Mutex<Option<SelectedFile>>,
    status: watch::Sender<UploadStatus>,
}

impl Uploader {
    pub fn new(api: Arc<dyn PdfSearchApi>, bus: NotificationBus) -> Self {
        let (status, _) = watch::channel(UploadStatus::Idle);
        Self {
            inner: Arc::new(UploaderInner {
                api,
                bus,
                selected: Mutex::new(None),
                status,
            }),
        }
    }

    /// Replace the current selection
    pub fn select(&self, file: SelectedFile) {
        tracing::debug!(file_name = %file.name, size = file.bytes.len(), "File selected");
        *self.inner.selected.lock() = Some(file);
    }

    pub fn clear_selection(&self) {
        *self.inner.selected.lock() = None;
    }

    pub fn selected_name(&self) -> Option<String> {
        self.inner.selected.lock().as_ref().map(|f| f.name.clone())
    }

    pub fn status(&self) -> UploadStatus {
        self.inner.status.borrow().clone()
    }

    /// Status rendered as the user-facing message
    pub fn status_message(&self) -> String {
        self.status().to_string()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadStatus> {
        self.inner.status.subscribe()
    }

    /// Submit the selected file
    ///
    /// Every outcome lands in the status line. A notification is published
    /// only when the backend accepted the file.
    pub async fn submit(&self) -> UploadStatus {
        let selected = self.inner.selected.lock().clone();
        let Some(file) = selected else {
            tracing::debug!("Submit without a selected file");
            return self.set_status(UploadStatus::NoFileSelected);
        };

        self.set_status(UploadStatus::Uploading {
            filename: file.name.clone(),
        });

        match self.inner.api.upload(&file).await {
            Ok(receipt) => {
                tracing::info!(
                    filename = %receipt.filename,
                    pages_processed = receipt.pages_processed,
                    "Upload complete"
                );

                let status = self.set_status(UploadStatus::Uploaded {
                    filename: receipt.filename.clone(),
                    pages_processed: receipt.pages_processed,
                });
                self.inner.bus.publish(PdfUploaded {
                    filename: receipt.filename,
                });
                status
            }
            Err(ClientError::Rejected { status, detail }) => {
                tracing::warn!(file_name = %file.name, status, detail = %detail, "Upload rejected");
                self.set_status(UploadStatus::Rejected { detail })
            }
            Err(e) => {
                tracing::warn!(file_name = %file.name, error = %e, "Upload failed");
                self.set_status(UploadStatus::Failed {
                    message: e.to_string(),
                })
            }
        }
    }

    fn set_status(&self, status: UploadStatus) -> UploadStatus {
        self.inner.status.send_replace(status.clone());
        status
    }
}
