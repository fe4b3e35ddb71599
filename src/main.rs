use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;

use tubedrop::cli::{Cli, Commands};
use tubedrop::core::{config, init_logger, log_startup_configuration};
use tubedrop::download::pipeline::ensure_download_dir;
use tubedrop::download::{prepare_delivery, ytdlp, DownloadMode, YtDlpExtractor};
use tubedrop::telegram::{create_bot, independent_updates, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // .env first so LOG_FILE_PATH and LOG_LEVEL can come from it
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH, &config::LOG_LEVEL)?;

    match cli.command {
        Some(Commands::Run) | None => run_bot().await,
        Some(Commands::Download { url, audio, output }) => run_cli_download(url, audio, output).await,
        Some(Commands::Check) => run_check().await,
    }
}

async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");

    let token = config::require_bot_token()?;

    ensure_download_dir(&config::DOWNLOAD_DIR)?;

    let (ytdlp_version, ffmpeg_version) = tokio::join!(ytdlp::ytdlp_version(), ytdlp::ffmpeg_version());
    log_startup_configuration(ytdlp_version.as_deref(), ffmpeg_version.as_deref());

    let bot = create_bot(&token)?;

    match bot.get_me().await {
        Ok(me) => log::info!("Bot username: {:?}, Bot ID: {}", me.username, me.id),
        Err(e) => return Err(anyhow::anyhow!("Failed to connect to Bot API: {}", e)),
    }

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let deps = HandlerDeps::from_config(Arc::new(YtDlpExtractor::from_config()));
    let handler = schema(deps);

    // Pending updates from before the restart are dropped
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    Dispatcher::builder(bot, handler)
        .distribution_function(independent_updates)
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}

/// Runs one extraction plus the size check and prints where the file landed.
async fn run_cli_download(url: String, audio: bool, output: Option<PathBuf>) -> Result<()> {
    let mode = if audio { DownloadMode::Audio } else { DownloadMode::Video };
    let dir = output.unwrap_or_else(|| config::DOWNLOAD_DIR.clone());
    ensure_download_dir(&dir)?;

    let extractor = YtDlpExtractor::from_config().with_download_dir(dir);
    log::info!("Downloading {} as {} into {}", url, mode, extractor.download_dir().display());

    match prepare_delivery(&extractor, &url, mode, *config::MAX_UPLOAD_MB).await {
        Ok(delivery) => {
            println!("{}", delivery.caption());
            println!("{} ({:.1} MB)", delivery.path.display(), delivery.size_mb());
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(e.user_message())),
    }
}

async fn run_check() -> Result<()> {
    let (ytdlp_version, ffmpeg_version) = tokio::join!(ytdlp::ytdlp_version(), ytdlp::ffmpeg_version());

    println!(
        "yt-dlp ({}): {}",
        config::YTDL_BIN.as_str(),
        ytdlp_version.as_deref().unwrap_or("not found")
    );
    println!(
        "ffmpeg ({}): {}",
        config::FFMPEG_BIN.as_str(),
        ffmpeg_version.as_deref().unwrap_or("not found")
    );
    println!("upload limit: {} MB", *config::MAX_UPLOAD_MB);
    println!("download dir: {}", config::DOWNLOAD_DIR.display());

    if ytdlp_version.is_none() {
        anyhow::bail!("yt-dlp is not available");
    }
    Ok(())
}
