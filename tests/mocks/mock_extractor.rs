//! Mock extractor standing in for yt-dlp

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

use tubedrop::download::{DownloadError, DownloadMode, DownloadedMedia, MediaExtractor};

/// What the next fetch should produce
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Write a file of `size_bytes` named after the title
    File { title: String, size_bytes: u64 },
    /// Report a path that was never written
    Missing { title: String },
    /// Fail as yt-dlp would, with this message
    Fail(String),
}

pub struct MockExtractor {
    dir: TempDir,
    outcome: MockOutcome,
    calls: AtomicUsize,
}

impl MockExtractor {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn file(title: &str, size_bytes: u64) -> Self {
        Self::new(MockOutcome::File {
            title: title.to_string(),
            size_bytes,
        })
    }

    pub fn failing(message: &str) -> Self {
        Self::new(MockOutcome::Fail(message.to_string()))
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn path_for(&self, title: &str, mode: DownloadMode) -> PathBuf {
        let ext = if mode.is_audio() { "mp3" } else { "mp4" };
        self.dir.path().join(format!("{}.{}", title, ext))
    }
}

#[async_trait]
impl MediaExtractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, _url: &str, mode: DownloadMode) -> Result<DownloadedMedia, DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.outcome {
            MockOutcome::File { title, size_bytes } => {
                let path = self.path_for(title, mode);
                let file = std::fs::File::create(&path).map_err(|e| DownloadError::Extraction(e.to_string()))?;
                file.set_len(*size_bytes)
                    .map_err(|e| DownloadError::Extraction(e.to_string()))?;
                Ok(DownloadedMedia {
                    path,
                    title: title.clone(),
                })
            }
            MockOutcome::Missing { title } => Ok(DownloadedMedia {
                path: self.path_for(title, mode),
                title: title.clone(),
            }),
            MockOutcome::Fail(message) => Err(DownloadError::Extraction(message.clone())),
        }
    }
}
