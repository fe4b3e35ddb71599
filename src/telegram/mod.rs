//! Telegram bot integration and handlers

pub mod bot;
pub mod handlers;
pub mod keyboard;
pub mod send;
pub mod url;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{independent_updates, schema, HandlerDeps, HandlerError};
pub use keyboard::{choice_keyboard, ChoicePayload, UrlStash, CHOICE_PROMPT};
pub use send::send_delivery;
pub use url::extract_video_url;
