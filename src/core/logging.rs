//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A startup banner listing the external tools and limits in effect

use anyhow::Result;
use simplelog::*;
use std::str::FromStr;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file (truncated on start)
/// * `level` - Level name (`error`, `warn`, `info`, `debug`, `trace`); unknown names fall back to `info`
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the log file or a logger was already installed
pub fn init_logger(log_file_path: &str, level: &str) -> Result<()> {
    let log_file =
        fs_err::File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;
    let level = parse_level(level);

    // HTTP internals are chatty at debug level and drown out update handling
    let log_config = ConfigBuilder::new()
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .add_filter_ignore_str("rustls")
        .build();

    CombinedLogger::init(vec![
        TermLogger::new(level, log_config.clone(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, log_config, log_file.into_parts().0),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level.trim()).unwrap_or(LevelFilter::Info)
}

/// Logs the tool versions and limits the bot runs with.
///
/// `None` for a tool means the binary could not be executed.
pub fn log_startup_configuration(ytdlp_version: Option<&str>, ffmpeg_version: Option<&str>) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🔧 Startup configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match ytdlp_version {
        Some(version) => log::info!("✅ yt-dlp ({}): {}", config::YTDL_BIN.as_str(), version),
        None => {
            log::error!("❌ yt-dlp ({}): NOT FOUND", config::YTDL_BIN.as_str());
            log::error!("   Every download will fail until YTDL_BIN points to a working yt-dlp");
        }
    }

    match ffmpeg_version {
        Some(version) => log::info!("✅ ffmpeg ({}): {}", config::FFMPEG_BIN.as_str(), version),
        None => {
            log::warn!("⚠️  ffmpeg ({}): NOT FOUND", config::FFMPEG_BIN.as_str());
            log::warn!("   Audio (MP3) requests will be refused and video streams cannot be merged");
        }
    }

    log::info!("📁 Download dir: {}", config::DOWNLOAD_DIR.display());
    log::info!("📦 Upload limit: {} MB", *config::MAX_UPLOAD_MB);
    log::info!("⏱️  yt-dlp timeout: {}s", config::download::ytdlp_timeout().as_secs());
    if let Some(url) = config::BOT_API_URL.as_deref() {
        log::info!("🌐 Bot API URL: {}", url);
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
        assert_eq!(parse_level("loud"), LevelFilter::Info);
    }

    #[test]
    fn test_init_logger_creates_log_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        // A second test binary may already own the global logger; only the file matters here
        let _ = init_logger(path, "info");
        assert!(temp_file.path().exists());
    }

    #[test]
    fn test_init_logger_fails_for_missing_directory() {
        let result = init_logger("/definitely/not/a/dir/tubedrop.log", "info");
        assert!(result.is_err());
    }
}
