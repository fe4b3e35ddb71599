//! yt-dlp backend.
//!
//! One yt-dlp run per request, executed on tokio's blocking pool. The two
//! option sets (MP3 extraction and capped-resolution MP4) are fixed; there is
//! no retry or fallback chain, a failed run is reported once.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tokio::process::Command as TokioCommand;

use crate::core::config;
use crate::core::process::{run_with_timeout, wait_with_output_timeout};
use crate::download::source::{DownloadedMedia, MediaExtractor};
use crate::download::{DownloadError, DownloadMode};

/// Title used when the source reports none
pub const FALLBACK_TITLE: &str = "video";

/// Printed by yt-dlp once the final file is in place (after post-processors ran)
const PRINT_TEMPLATE: &str = "after_move:%(.{title,filepath})j";

/// Download source powered by the yt-dlp binary.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    ytdl_bin: String,
    ffmpeg_bin: String,
    download_dir: PathBuf,
    timeout: Duration,
}

impl YtDlpExtractor {
    pub fn new(
        ytdl_bin: impl Into<String>,
        ffmpeg_bin: impl Into<String>,
        download_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            ytdl_bin: ytdl_bin.into(),
            ffmpeg_bin: ffmpeg_bin.into(),
            download_dir: download_dir.into(),
            timeout,
        }
    }

    /// Extractor configured from the environment (`YTDL_BIN`, `FFMPEG_BIN`, `DOWNLOAD_DIR`, `YTDL_TIMEOUT_SECS`).
    pub fn from_config() -> Self {
        Self::new(
            config::YTDL_BIN.as_str(),
            config::FFMPEG_BIN.as_str(),
            config::DOWNLOAD_DIR.clone(),
            config::download::ytdlp_timeout(),
        )
    }

    /// Same settings, different output directory (CLI `--output`).
    pub fn with_download_dir(mut self, download_dir: impl Into<PathBuf>) -> Self {
        self.download_dir = download_dir.into();
        self
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Blocking body of [`MediaExtractor::fetch`].
    fn fetch_blocking(&self, url: &str, mode: DownloadMode) -> Result<DownloadedMedia, DownloadError> {
        if mode.is_audio() && !ffmpeg_available(&self.ffmpeg_bin) {
            log::warn!("Refusing audio request: ffmpeg ({}) is not available", self.ffmpeg_bin);
            return Err(DownloadError::FfmpegMissing);
        }

        let template = output_template(&self.download_dir);
        let mut args = build_args(mode, url, &template);
        if self.ffmpeg_bin != "ffmpeg" {
            args.push("--ffmpeg-location".to_string());
            args.push(self.ffmpeg_bin.clone());
        }

        log::info!("Running {} ({}) for {}", self.ytdl_bin, mode, url);
        log::debug!("yt-dlp args: {:?}", args);

        let child = Command::new(&self.ytdl_bin)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DownloadError::Extraction(format!("failed to run {}: {}", self.ytdl_bin, e)))?;

        let output = wait_with_output_timeout(&self.ytdl_bin, child, self.timeout)
            .map_err(|e| DownloadError::Extraction(e.to_string()))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            log::error!("yt-dlp failed for {} ({}): {}", url, output.status, stderr.trim());
            return Err(DownloadError::Extraction(error_message_from_stderr(
                &stderr,
                &output.status.to_string(),
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let info = parse_printed_info(&stdout).ok_or_else(|| {
            log::error!("yt-dlp printed no file info for {}; stdout: {:?}", url, stdout.trim());
            DownloadError::FileNotFound
        })?;

        resolve_media(info, mode)
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn fetch(&self, url: &str, mode: DownloadMode) -> Result<DownloadedMedia, DownloadError> {
        let extractor = self.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || extractor.fetch_blocking(&url, mode))
            .await
            .map_err(|e| DownloadError::Extraction(format!("download task failed: {}", e)))?
    }
}

/// `<dir>/%(title).200s.%(ext)s`
pub fn output_template(download_dir: &Path) -> String {
    download_dir
        .join(format!("%(title).{}s.%(ext)s", config::download::MAX_TITLE_CHARS))
        .to_string_lossy()
        .into_owned()
}

/// Format selector for the MP4 option: best mp4 video up to 720p with m4a audio,
/// then progressively looser pre-muxed fallbacks.
pub fn video_format_selector() -> String {
    let h = config::download::MAX_VIDEO_HEIGHT;
    format!("bv*[ext=mp4][height<={h}]+ba[ext=m4a]/b[ext=mp4][height<={h}]/best[ext=mp4]/best")
}

/// Full yt-dlp argument list for one request.
pub fn build_args(mode: DownloadMode, url: &str, output_template: &str) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-o".into(),
        output_template.into(),
        "--no-playlist".into(),
        "--quiet".into(),
        "--no-warnings".into(),
        "--no-simulate".into(),
        "--print".into(),
        PRINT_TEMPLATE.into(),
    ];

    match mode {
        DownloadMode::Audio => {
            args.extend([
                "-f".into(),
                "bestaudio/best".into(),
                "--extract-audio".into(),
                "--audio-format".into(),
                "mp3".into(),
                "--audio-quality".into(),
                format!("{}K", config::download::AUDIO_BITRATE_KBPS),
            ]);
        }
        DownloadMode::Video => {
            args.extend([
                "-f".into(),
                video_format_selector(),
                "--merge-output-format".into(),
                "mp4".into(),
            ]);
        }
    }

    // End of options: a URL starting with '-' must not be read as a flag
    args.push("--".into());
    args.push(url.to_string());
    args
}

/// Fields of the `--print` JSON line
#[derive(Debug, Deserialize, PartialEq)]
struct PrintedInfo {
    title: Option<String>,
    filepath: Option<String>,
}

/// Last stdout line that parses as the printed info object.
fn parse_printed_info(stdout: &str) -> Option<PrintedInfo> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .find_map(|line| serde_json::from_str::<PrintedInfo>(line).ok())
}

fn resolve_media(info: PrintedInfo, mode: DownloadMode) -> Result<DownloadedMedia, DownloadError> {
    let mut path = match info.filepath {
        Some(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => return Err(DownloadError::FileNotFound),
    };
    if mode.is_audio() {
        path.set_extension("mp3");
    }

    let title = info
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    Ok(DownloadedMedia { path, title })
}

/// The message shown to the user for a failed run: yt-dlp's last `ERROR:` line,
/// else the whole stderr, else the exit status.
fn error_message_from_stderr(stderr: &str, status: &str) -> String {
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    if let Some(line) = lines.iter().rev().find(|l| l.starts_with("ERROR:")) {
        return line.to_string();
    }
    if !lines.is_empty() {
        return lines.join("\n");
    }
    format!("yt-dlp exited with {}", status)
}

/// `FFMPEG_BIN` may name the binary or, like `--ffmpeg-location`, the directory holding it.
pub fn ffmpeg_executable(ffmpeg_bin: &str) -> PathBuf {
    let path = Path::new(ffmpeg_bin);
    if path.is_dir() {
        path.join("ffmpeg")
    } else {
        path.to_path_buf()
    }
}

/// Whether `ffmpeg -version` runs. Blocking.
pub fn ffmpeg_available(ffmpeg_bin: &str) -> bool {
    Command::new(ffmpeg_executable(ffmpeg_bin))
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// First line of `<bin> <flag>`, or `None` when the tool cannot be run.
pub async fn probe_version(bin: &str, flag: &str) -> Option<String> {
    let mut cmd = TokioCommand::new(bin);
    cmd.arg(flag).stdin(Stdio::null());

    match run_with_timeout(bin, &mut cmd, config::download::probe_timeout()).await {
        Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .map(|line| line.trim().to_string()),
        Ok(output) => {
            log::warn!("{} {} exited with {}", bin, flag, output.status);
            None
        }
        Err(e) => {
            log::warn!("{} {} failed: {}", bin, flag, e);
            None
        }
    }
}

/// yt-dlp version (`--version`)
pub async fn ytdlp_version() -> Option<String> {
    probe_version(config::YTDL_BIN.as_str(), "--version").await
}

/// ffmpeg version banner (`-version`)
pub async fn ffmpeg_version() -> Option<String> {
    let bin = ffmpeg_executable(config::FFMPEG_BIN.as_str());
    probe_version(&bin.to_string_lossy(), "-version").await
}
