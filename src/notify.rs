//! Upload notifications
//!
//! The Uploader announces finished uploads on a broadcast channel instead of
//! holding a reference to any Viewer. Any number of publishers and listeners
//! may share one bus; each listener sees every notification sent after it
//! subscribed.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event name carried in logs for upload notifications
pub const PDF_UPLOADED: &str = "pdf-uploaded";

/// Default number of notifications buffered per listener
const DEFAULT_CAPACITY: usize = 64;

/// Payload of a `pdf-uploaded` notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfUploaded {
    pub filename: String,
}

/// Broadcast channel for upload notifications
#[derive(Debug, Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<PdfUploaded>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Bus buffering up to `capacity` notifications per listener
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Announce a notification to every current listener
    ///
    /// Returns how many listeners received it. Publishing with nobody
    /// listening is not an error.
    pub fn publish(&self, notice: PdfUploaded) -> usize {
        let filename = notice.filename.clone();
        match self.sender.send(notice) {
            Ok(listeners) => {
                tracing::debug!(event = PDF_UPLOADED, filename = %filename, listeners, "Notification published");
                listeners
            }
            Err(_) => {
                tracing::debug!(event = PDF_UPLOADED, filename = %filename, "No listeners for notification");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PdfUploaded> {
        self.sender.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}
