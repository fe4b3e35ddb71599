use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{AppError, AppResult};

/// Configuration read once from the environment (after `.env` is loaded).
///
/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_default()
});

/// Maximum size of a file the bot will upload, in megabytes
/// Read from MAX_UPLOAD_MB environment variable
/// Default: 48 (just under the 50 MB Bot API limit)
pub static MAX_UPLOAD_MB: Lazy<u64> = Lazy::new(|| parse_u64_or("MAX_UPLOAD_MB", upload::DEFAULT_MAX_UPLOAD_MB));

/// Scratch directory where yt-dlp writes its output
/// Read from DOWNLOAD_DIR environment variable
/// Supports tilde (~) expansion for home directory
pub static DOWNLOAD_DIR: Lazy<PathBuf> = Lazy::new(|| {
    let raw = env::var("DOWNLOAD_DIR").unwrap_or_else(|_| "downloads".to_string());
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
});

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// ffmpeg binary used by yt-dlp for MP3 extraction and stream merging
pub static FFMPEG_BIN: Lazy<String> = Lazy::new(|| env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: tubedrop.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "tubedrop.log".to_string()));

/// Log level (error, warn, info, debug, trace)
pub static LOG_LEVEL: Lazy<String> = Lazy::new(|| env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

/// Optional custom Bot API server (e.g. a local telegram-bot-api instance)
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| {
    env::var("BOT_API_URL").ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
});

/// The bot token, or a configuration error when it is unset or blank
pub fn require_bot_token() -> AppResult<String> {
    let token = BOT_TOKEN.trim();
    if token.is_empty() {
        return Err(AppError::Config("BOT_TOKEN missing in .env".to_string()));
    }
    Ok(token.to_string())
}

fn parse_u64_or(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Invalid {} value {:?}, using default {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

/// Upload limits
pub mod upload {
    /// Default upload threshold in megabytes
    pub const DEFAULT_MAX_UPLOAD_MB: u64 = 48;

    /// Bytes in one megabyte, as used for the size check
    pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
}

/// Download configuration
pub mod download {
    use super::Duration;
    use once_cell::sync::Lazy;

    /// Default timeout for a single yt-dlp run (in seconds)
    pub const DEFAULT_YTDLP_TIMEOUT_SECS: u64 = 900;

    /// Timeout for yt-dlp runs, read from YTDL_TIMEOUT_SECS
    pub static YTDLP_TIMEOUT_SECS: Lazy<u64> =
        Lazy::new(|| super::parse_u64_or("YTDL_TIMEOUT_SECS", DEFAULT_YTDLP_TIMEOUT_SECS));

    /// Titles longer than this are cut in the output file name
    pub const MAX_TITLE_CHARS: usize = 200;

    /// MP3 bitrate in kbps for audio extraction
    pub const AUDIO_BITRATE_KBPS: u32 = 192;

    /// Maximum video height for the MP4 option
    pub const MAX_VIDEO_HEIGHT: u32 = 720;

    /// yt-dlp command timeout duration
    pub fn ytdlp_timeout() -> Duration {
        Duration::from_secs(*YTDLP_TIMEOUT_SECS)
    }

    /// Timeout for `--version` probes of external tools
    pub fn probe_timeout() -> Duration {
        Duration::from_secs(15)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Long enough for uploads close to the size limit on slow links
    pub const REQUEST_TIMEOUT_SECS: u64 = 300;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Callback payload configuration
pub mod callback {
    use super::Duration;

    /// Telegram limit for `callback_data`, in bytes
    pub const MAX_DATA_BYTES: usize = 64;

    /// How long a stashed long URL stays resolvable after the prompt is shown
    pub const STASH_TTL_SECS: u64 = 3600;

    /// Upper bound on stashed URLs
    pub const STASH_CAPACITY: u64 = 10_000;

    pub fn stash_ttl() -> Duration {
        Duration::from_secs(STASH_TTL_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u64_or_falls_back_on_missing_var() {
        assert_eq!(parse_u64_or("TUBEDROP_TEST_SURELY_UNSET_VAR", 7), 7);
    }

    #[test]
    fn test_default_limits() {
        assert_eq!(upload::DEFAULT_MAX_UPLOAD_MB, 48);
        assert_eq!(download::AUDIO_BITRATE_KBPS, 192);
        assert_eq!(download::MAX_VIDEO_HEIGHT, 720);
        assert_eq!(callback::MAX_DATA_BYTES, 64);
    }
}
