//! Extraction backend abstraction.
//!
//! The bot never talks to yt-dlp directly: handlers hold an
//! `Arc<dyn MediaExtractor>`, production wires in [`YtDlpExtractor`](super::ytdlp::YtDlpExtractor)
//! and tests wire in a mock.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{DownloadError, DownloadMode};

/// A file the extractor produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedMedia {
    /// Final path, after post-processing (audio extraction, merging)
    pub path: PathBuf,
    /// Title reported by the source, `video` when it reported none
    pub title: String,
}

/// Resolves a shared URL to a local media file.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Human-readable backend name, used in logs
    fn name(&self) -> &str;

    /// Download `url` in the requested mode. Must not block the async runtime.
    async fn fetch(&self, url: &str, mode: DownloadMode) -> Result<DownloadedMedia, DownloadError>;
}
