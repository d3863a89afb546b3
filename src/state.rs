//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::extract::{LopdfExtractor, TextExtractor};
use crate::store::PageStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: PageStore,
    extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    /// Create state that extracts text with lopdf
    pub fn new(config: Config) -> Self {
        Self::with_extractor(config, Arc::new(LopdfExtractor))
    }

    pub fn with_extractor(config: Config, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store: PageStore::new(),
                extractor,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the page index
    pub fn store(&self) -> &PageStore {
        &self.inner.store
    }

    /// Get the text extractor
    pub fn extractor(&self) -> Arc<dyn TextExtractor> {
        self.inner.extractor.clone()
    }
}
