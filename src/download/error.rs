use thiserror::Error;

/// The ways a download request can fail, as the user sees them.
///
/// None of these are retried: each one ends the request with an edit of the
/// status message (see [`DownloadError::user_message`]).
#[derive(Debug, Error)]
pub enum DownloadError {
    /// yt-dlp failed; carries the tool's own message verbatim
    #[error("Error: {0}")]
    Extraction(String),

    /// MP3 extraction needs ffmpeg and none was found
    #[error("ffmpeg is required for MP3")]
    FfmpegMissing,

    /// yt-dlp reported success but the output file is not there
    #[error("File not found.")]
    FileNotFound,

    /// The file exceeds the upload threshold
    #[error("File too big: {size_mb:.1} MB > {limit_mb} MB")]
    TooLarge { size_mb: f64, limit_mb: u64 },
}

impl DownloadError {
    /// Text the status message is edited to.
    pub fn user_message(&self) -> String {
        match self {
            DownloadError::TooLarge { .. } => format!("⚠️ {}", self),
            _ => format!("❌ {}", self),
        }
    }

    /// Returns subcategory for logs
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::Extraction(_) => "extraction",
            DownloadError::FfmpegMissing => "ffmpeg_missing",
            DownloadError::FileNotFound => "file_not_found",
            DownloadError::TooLarge { .. } => "too_large",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extraction_message_is_verbatim() {
        let err = DownloadError::Extraction("ERROR: [youtube] abc: Video unavailable".into());
        assert_eq!(err.user_message(), "❌ Error: ERROR: [youtube] abc: Video unavailable");
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(DownloadError::FileNotFound.user_message(), "❌ File not found.");
        assert_eq!(DownloadError::FfmpegMissing.user_message(), "❌ ffmpeg is required for MP3");
    }

    #[test]
    fn test_too_large_message_has_both_sizes() {
        let err = DownloadError::TooLarge {
            size_mb: 51.26,
            limit_mb: 48,
        };
        assert_eq!(err.user_message(), "⚠️ File too big: 51.3 MB > 48 MB");
    }

    #[test]
    fn test_subcategory() {
        assert_eq!(DownloadError::Extraction(String::new()).subcategory(), "extraction");
        assert_eq!(DownloadError::FileNotFound.subcategory(), "file_not_found");
        assert_eq!(
            DownloadError::TooLarge {
                size_mb: 1.0,
                limit_mb: 0
            }
            .subcategory(),
            "too_large"
        );
    }
}
