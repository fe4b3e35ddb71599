//! Command handler implementations (/start, /help)

use teloxide::prelude::*;

use super::types::HandlerError;

pub const WELCOME_TEXT: &str = "👋 Hi! Send me a YouTube link and choose: video or audio.";
pub const HELP_TEXT: &str = "Send me a YouTube link. I’ll let you choose video or audio.";

/// Handle /start command
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, WELCOME_TEXT).await?;
    Ok(())
}

/// Handle /help command
pub(super) async fn handle_help_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, HELP_TEXT).await?;
    Ok(())
}
