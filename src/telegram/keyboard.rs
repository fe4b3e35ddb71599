//! The two-button format prompt and its callback payload.
//!
//! Payload format is `<mode>|<url>`. Telegram rejects `callback_data` longer
//! than 64 bytes, so long links are parked in a [`UrlStash`] and the payload
//! carries `<mode>|#<token>` instead.

use moka::sync::Cache;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use thiserror::Error;

use crate::core::config;
use crate::download::DownloadMode;

const SEPARATOR: char = '|';
const TOKEN_PREFIX: char = '#';

/// Text of the prompt message
pub const CHOICE_PROMPT: &str = "Choose format:";

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("payload has no '|' separator")]
    Malformed,

    #[error("unknown mode {0:?}")]
    UnknownMode(String),

    #[error("link token {0:?} expired or unknown")]
    Expired(String),
}

/// Short-lived map from token to long URL.
pub struct UrlStash {
    cache: Cache<String, String>,
    next_id: AtomicU64,
}

impl UrlStash {
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(capacity).time_to_live(ttl).build(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from_config() -> Self {
        Self::new(config::callback::stash_ttl(), config::callback::STASH_CAPACITY)
    }

    /// Stores `url` and returns the token that resolves to it.
    pub fn stash(&self, url: &str) -> String {
        let token = format!("{:x}", self.next_id.fetch_add(1, Ordering::Relaxed));
        self.cache.insert(token.clone(), url.to_string());
        token
    }

    pub fn resolve(&self, token: &str) -> Option<String> {
        self.cache.get(token)
    }
}

impl Default for UrlStash {
    fn default() -> Self {
        Self::from_config()
    }
}

/// Mode and link carried by a prompt button.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoicePayload {
    pub mode: DownloadMode,
    pub url: String,
}

impl ChoicePayload {
    /// Parses `<mode>|<url>` or `<mode>|#<token>`.
    pub fn parse(data: &str, stash: &UrlStash) -> Result<Self, PayloadError> {
        let (mode, reference) = data.split_once(SEPARATOR).ok_or(PayloadError::Malformed)?;
        let mode = DownloadMode::from_str(mode).map_err(|_| PayloadError::UnknownMode(mode.to_string()))?;

        let url = match reference.strip_prefix(TOKEN_PREFIX) {
            Some(token) => stash
                .resolve(token)
                .ok_or_else(|| PayloadError::Expired(token.to_string()))?,
            None => reference.to_string(),
        };

        Ok(Self { mode, url })
    }

    /// Callback data for this choice, never longer than Telegram allows.
    pub fn encode(&self, stash: &UrlStash) -> String {
        payload(self.mode, &url_reference(&self.url, stash))
    }
}

/// What goes after the separator: the URL itself when every mode's payload fits, else a stash token.
fn url_reference(url: &str, stash: &UrlStash) -> String {
    let longest_mode = [DownloadMode::Video, DownloadMode::Audio]
        .iter()
        .map(|m| m.to_string().len())
        .max()
        .unwrap_or(0);

    if longest_mode + SEPARATOR.len_utf8() + url.len() <= config::callback::MAX_DATA_BYTES {
        url.to_string()
    } else {
        format!("{}{}", TOKEN_PREFIX, stash.stash(url))
    }
}

fn payload(mode: DownloadMode, reference: &str) -> String {
    format!("{}{}{}", mode, SEPARATOR, reference)
}

/// Two rows: video first, then audio.
pub fn choice_keyboard(url: &str, stash: &UrlStash) -> InlineKeyboardMarkup {
    let reference = url_reference(url, stash);

    InlineKeyboardMarkup::new(
        [DownloadMode::Video, DownloadMode::Audio]
            .into_iter()
            .map(|mode| vec![InlineKeyboardButton::callback(mode.button_label(), payload(mode, &reference))]),
    )
}
