//! Viewer component
//!
//! Shows either a full document or a list of search matches. The display
//! region is an explicit [`ViewerState`]; every successful or failed action
//! replaces it wholesale.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::render;
use crate::client::PdfSearchApi;
use crate::notify::{NotificationBus, PDF_UPLOADED};
use crate::types::{Page, SearchResult};

/// What the display region currently holds
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewerState {
    #[default]
    Empty,
    ShowingDocument { filename: String, pages: Vec<Page> },
    ShowingResults { query: String, results: Vec<SearchResult> },
    ShowingError { message: String },
}

impl ViewerState {
    /// Number of page or result blocks on display
    pub fn block_count(&self) -> usize {
        match self {
            Self::ShowingDocument { pages, .. } => pages.len(),
            Self::ShowingResults { results, .. } => results.len(),
            Self::Empty | Self::ShowingError { .. } => 0,
        }
    }
}

/// Which response wins when actions overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseOrdering {
    /// The response that resolves last overwrites the display
    #[default]
    LastResolved,
    /// Responses to actions older than the one on display are dropped
    LastIssued,
}

/// Document and search result viewer
#[derive(Clone)]
pub struct Viewer {
    inner: Arc<ViewerInner>,
}

struct ViewerInner {
    api: Arc<dyn PdfSearchApi>,
    ordering: ResponseOrdering,
    query: Mutex<String>,
    /// Ticket of the most recently started action
    issued: AtomicU64,
    /// Ticket of the action whose result is on display
    shown: Mutex<u64>,
    display: watch::Sender<ViewerState>,
}

impl Viewer {
    pub fn new(api: Arc<dyn PdfSearchApi>) -> Self {
        Self::with_ordering(api, ResponseOrdering::default())
    }

    pub fn with_ordering(api: Arc<dyn PdfSearchApi>, ordering: ResponseOrdering) -> Self {
        let (display, _) = watch::channel(ViewerState::Empty);
        Self {
            inner: Arc::new(ViewerInner {
                api,
                ordering,
                query: Mutex::new(String::new()),
                issued: AtomicU64::new(0),
                shown: Mutex::new(0),
                display,
            }),
        }
    }

    /// Set the search box text
    pub fn set_query(&self, text: impl Into<String>) {
        *self.inner.query.lock() = text.into();
    }

    pub fn query(&self) -> String {
        self.inner.query.lock().clone()
    }

    pub fn state(&self) -> ViewerState {
        self.inner.display.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewerState> {
        self.inner.display.subscribe()
    }

    /// Render the display region as escaped markup
    pub fn render_html(&self) -> String {
        render::render(&self.inner.display.borrow())
    }

    /// Fetch a document and show all of its pages
    pub async fn load_document(&self, filename: &str) {
        let ticket = self.issue();

        let state = match self.inner.api.document(filename).await {
            Ok(pages) => {
                tracing::debug!(filename = %filename, pages = pages.len(), "Document loaded");
                ViewerState::ShowingDocument {
                    filename: filename.to_string(),
                    pages,
                }
            }
            Err(e) => {
                tracing::warn!(filename = %filename, error = %e, "Failed to load document");
                ViewerState::ShowingError {
                    message: format!("Error loading document: {}", e),
                }
            }
        };

        self.apply(ticket, state);
    }

    /// Search with the current query and show the matches
    ///
    /// A blank query does nothing: no request, no change to the display.
    pub async fn search_content(&self) {
        let query = self.inner.query.lock().trim().to_string();
        if query.is_empty() {
            tracing::debug!("Ignoring blank search");
            return;
        }

        let ticket = self.issue();

        let state = match self.inner.api.search(&query).await {
            Ok(results) => {
                tracing::debug!(query = %query, results = results.len(), "Search complete");
                ViewerState::ShowingResults { query, results }
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Search failed");
                ViewerState::ShowingError {
                    message: format!("Error searching: {}", e),
                }
            }
        };

        self.apply(ticket, state);
    }

    /// Load every document announced on the bus
    ///
    /// The subscription is taken before this returns, so notifications
    /// published afterwards are never missed. Listening stops when the
    /// returned handle is dropped.
    #[must_use = "the viewer stops listening as soon as the subscription is dropped"]
    pub fn attach(&self, bus: &NotificationBus) -> ViewerSubscription {
        let mut notices = bus.subscribe();
        let viewer = self.clone();

        let task = tokio::spawn(async move {
            loop {
                match notices.recv().await {
                    Ok(notice) => {
                        tracing::debug!(
                            event = PDF_UPLOADED,
                            filename = %notice.filename,
                            "Viewer received notification"
                        );
                        let viewer = viewer.clone();
                        tokio::spawn(async move {
                            viewer.load_document(&notice.filename).await;
                        });
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(event = PDF_UPLOADED, skipped, "Viewer fell behind on notifications");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        ViewerSubscription { task }
    }

    fn issue(&self) -> u64 {
        self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn apply(&self, ticket: u64, state: ViewerState) {
        let mut shown = self.inner.shown.lock();

        if self.inner.ordering == ResponseOrdering::LastIssued && ticket < *shown {
            tracing::debug!(ticket, shown = *shown, "Dropping stale response");
            return;
        }

        *shown = (*shown).max(ticket);
        self.inner.display.send_replace(state);
    }
}

/// Handle to a viewer's notification listener
///
/// Dropping the handle stops the listener.
#[derive(Debug)]
#[must_use = "the viewer stops listening as soon as the subscription is dropped"]
pub struct ViewerSubscription {
    task: JoinHandle<()>,
}

impl ViewerSubscription {
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop listening for notifications
    pub fn detach(self) {}
}

impl Drop for ViewerSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
