//! PDF Search Library
//!
//! Upload a PDF, then browse its extracted text page by page or search across
//! every uploaded document.
//!
//! # Modules
//!
//! - `components`: the Uploader and Viewer, coordinated only through `notify`
//! - `notify`: the `pdf-uploaded` broadcast channel
//! - `client`: the `PdfSearchApi` seam and its reqwest implementation
//! - `routes`, `state`, `store`, `extract`: the reference HTTP backend
//! - `types`: wire types shared by both sides

pub mod client;
pub mod components;
pub mod config;
pub mod error;
pub mod extract;
pub mod notify;
pub mod routes;
pub mod state;
pub mod store;
pub mod types;

pub use client::{ClientError, HttpClient, PdfSearchApi};
pub use components::{ResponseOrdering, UploadStatus, Uploader, Viewer, ViewerState, ViewerSubscription};
pub use notify::{NotificationBus, PdfUploaded, PDF_UPLOADED};
pub use types::{Page, SearchResult, SelectedFile, UploadReceipt};
