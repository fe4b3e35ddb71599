use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tubedrop")]
#[command(author, version, about = "Telegram bot that turns YouTube links into MP4 or MP3 files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the bot (long polling)
    Run,

    /// Download a single link locally, without Telegram
    Download {
        /// Video URL
        url: String,

        /// Extract MP3 audio instead of MP4 video
        #[arg(long)]
        audio: bool,

        /// Output directory (defaults to DOWNLOAD_DIR)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show yt-dlp and ffmpeg availability
    Check,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
