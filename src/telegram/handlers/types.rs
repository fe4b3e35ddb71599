//! Handler types and dependencies

use std::sync::Arc;

use crate::core::config;
use crate::download::MediaExtractor;
use crate::telegram::keyboard::UrlStash;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub extractor: Arc<dyn MediaExtractor>,
    pub url_stash: Arc<UrlStash>,
    pub max_upload_mb: u64,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(extractor: Arc<dyn MediaExtractor>, url_stash: Arc<UrlStash>, max_upload_mb: u64) -> Self {
        Self {
            extractor,
            url_stash,
            max_upload_mb,
        }
    }

    /// Dependencies with the stash and upload limit taken from the environment
    pub fn from_config(extractor: Arc<dyn MediaExtractor>) -> Self {
        Self::new(extractor, Arc::new(UrlStash::from_config()), *config::MAX_UPLOAD_MB)
    }
}
