//! Telegram bot handler tree configuration
//!
//! The handlers are organized in a testable way, allowing integration tests
//! to use the same handler tree as production code.

mod choice;
mod commands;
mod schema;
mod types;

pub use choice::{DOWNLOADING_TEXT, EXPIRED_TEXT};
pub use commands::{HELP_TEXT, WELCOME_TEXT};
pub use schema::{independent_updates, schema};
pub use types::{HandlerDeps, HandlerError};
