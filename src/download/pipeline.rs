//! From a chosen mode to a file that is safe to upload.
//!
//! The Telegram layer only ever sees a [`Delivery`] (send it) or a
//! [`DownloadError`] (show it), so a failed download can never reach the
//! upload call.

use std::path::{Path, PathBuf};

use crate::core::config;
use crate::download::source::MediaExtractor;
use crate::download::{DownloadError, DownloadMode};

/// A downloaded file that exists and fits under the upload limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub path: PathBuf,
    pub title: String,
    pub mode: DownloadMode,
    pub size_bytes: u64,
}

impl Delivery {
    /// Size in megabytes, as used by the limit check
    pub fn size_mb(&self) -> f64 {
        bytes_to_mb(self.size_bytes)
    }

    /// Caption of the uploaded file: mode icon plus title
    pub fn caption(&self) -> String {
        format!("{} {}", self.mode.caption_icon(), self.title)
    }

    /// File name shown to the user for document uploads
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.{}", self.title, if self.mode.is_audio() { "mp3" } else { "mp4" }))
    }
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / config::upload::BYTES_PER_MB
}

/// Runs the extractor once and checks the result against the upload limit.
///
/// # Errors
/// - whatever the extractor returns (not retried)
/// - [`DownloadError::FileNotFound`] when the reported path is not a file
/// - [`DownloadError::TooLarge`] when the file is strictly bigger than `limit_mb`;
///   the oversized file is removed before returning
pub async fn prepare_delivery(
    extractor: &dyn MediaExtractor,
    url: &str,
    mode: DownloadMode,
    limit_mb: u64,
) -> Result<Delivery, DownloadError> {
    let media = extractor.fetch(url, mode).await?;

    let metadata = match fs_err::tokio::metadata(&media.path).await {
        Ok(m) if m.is_file() => m,
        Ok(_) => {
            log::error!("{} output is not a regular file: {}", extractor.name(), media.path.display());
            return Err(DownloadError::FileNotFound);
        }
        Err(e) => {
            log::error!("{} output missing: {}", extractor.name(), e);
            return Err(DownloadError::FileNotFound);
        }
    };

    let size_bytes = metadata.len();
    let size_mb = bytes_to_mb(size_bytes);
    if size_mb > limit_mb as f64 {
        log::warn!(
            "Rejecting {} ({:.1} MB > {} MB): {}",
            url,
            size_mb,
            limit_mb,
            media.path.display()
        );
        remove_scratch_file(&media.path).await;
        return Err(DownloadError::TooLarge { size_mb, limit_mb });
    }

    log::info!(
        "Ready to send {} ({:.1} MB, {}): {}",
        media.title,
        size_mb,
        mode,
        media.path.display()
    );

    Ok(Delivery {
        path: media.path,
        title: media.title,
        mode,
        size_bytes,
    })
}

/// Deletes a file from the scratch directory. A file that is already gone is fine.
pub async fn remove_scratch_file(path: &Path) {
    match fs_err::tokio::remove_file(path).await {
        Ok(()) => log::debug!("Removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Failed to remove scratch file: {}", e),
    }
}

/// Creates the scratch directory if needed.
pub fn ensure_download_dir(dir: &Path) -> std::io::Result<()> {
    fs_err::create_dir_all(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::source::DownloadedMedia;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    /// Returns a fixed result without touching the network
    struct FixedExtractor(Result<DownloadedMedia, String>);

    #[async_trait]
    impl MediaExtractor for FixedExtractor {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch(&self, _url: &str, _mode: DownloadMode) -> Result<DownloadedMedia, DownloadError> {
            self.0.clone().map_err(DownloadError::Extraction)
        }
    }

    fn write_file(dir: &Path, name: &str, len: usize) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, vec![0u8; len]).unwrap();
        path
    }

    #[test]
    fn test_bytes_to_mb() {
        assert_eq!(bytes_to_mb(1024 * 1024), 1.0);
        assert_eq!(bytes_to_mb(0), 0.0);
    }

    #[test]
    fn test_caption_and_file_name() {
        let delivery = Delivery {
            path: PathBuf::from("downloads/Song.mp3"),
            title: "Song".into(),
            mode: DownloadMode::Audio,
            size_bytes: 10,
        };
        assert_eq!(delivery.caption(), "🎵 Song");
        assert_eq!(delivery.file_name(), "Song.mp3");

        let video = Delivery {
            mode: DownloadMode::Video,
            ..delivery
        };
        assert_eq!(video.caption(), "🎬 Song");
    }

    #[tokio::test]
    async fn test_file_at_limit_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "Clip.mp4", 1024 * 1024);
        let extractor = FixedExtractor(Ok(DownloadedMedia {
            path: path.clone(),
            title: "Clip".into(),
        }));

        let delivery = prepare_delivery(&extractor, "https://youtu.be/x", DownloadMode::Video, 1)
            .await
            .unwrap();
        assert_eq!(delivery.size_bytes, 1024 * 1024);
        assert_eq!(delivery.path, path);
    }

    #[tokio::test]
    async fn test_file_over_limit_is_rejected_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "Clip.mp4", 1024 * 1024 + 1);
        let extractor = FixedExtractor(Ok(DownloadedMedia {
            path: path.clone(),
            title: "Clip".into(),
        }));

        let err = prepare_delivery(&extractor, "https://youtu.be/x", DownloadMode::Video, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::TooLarge { limit_mb: 1, .. }));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = FixedExtractor(Ok(DownloadedMedia {
            path: dir.path().join("gone.mp4"),
            title: "Gone".into(),
        }));

        let err = prepare_delivery(&extractor, "https://youtu.be/x", DownloadMode::Video, 48)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::FileNotFound));
    }

    #[tokio::test]
    async fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = FixedExtractor(Ok(DownloadedMedia {
            path: dir.path().to_path_buf(),
            title: "Dir".into(),
        }));

        let err = prepare_delivery(&extractor, "https://youtu.be/x", DownloadMode::Video, 48)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::FileNotFound));
    }

    #[tokio::test]
    async fn test_remove_scratch_file_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a.mp3", 3);
        remove_scratch_file(&path).await;
        assert!(!path.exists());
        remove_scratch_file(&path).await;
    }

    #[test]
    fn test_ensure_download_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_download_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
