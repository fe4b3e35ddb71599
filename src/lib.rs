//! tubedrop - Telegram bot that downloads YouTube links as MP4 video or MP3 audio
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging and subprocess helpers
//! - `download`: the yt-dlp backend, size checks and scratch-file handling
//! - `telegram`: bot setup, the format prompt and the dispatcher schema

pub mod cli;
pub mod core;
pub mod download;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult};
pub use download::{prepare_delivery, Delivery, DownloadError, DownloadMode, MediaExtractor, YtDlpExtractor};
pub use telegram::{create_bot, schema, HandlerDeps};
