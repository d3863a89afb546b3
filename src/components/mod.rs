//! Uploader and Viewer components
//!
//! The two components never reference each other. The Uploader publishes a
//! `pdf-uploaded` notification on a [`NotificationBus`](crate::notify::NotificationBus)
//! and any attached Viewer reacts by loading the announced document.

pub mod render;
mod uploader;
mod viewer;

pub use uploader::{UploadStatus, Uploader};
pub use viewer::{ResponseOrdering, Viewer, ViewerState, ViewerSubscription};
