//! Link detection, the format prompt and the download that follows a button press.

use teloxide::prelude::*;
use teloxide::types::MessageId;

use super::types::{HandlerDeps, HandlerError};
use crate::download::{prepare_delivery, remove_scratch_file};
use crate::telegram::keyboard::{choice_keyboard, ChoicePayload, PayloadError, CHOICE_PROMPT};
use crate::telegram::send::send_delivery;
use crate::telegram::url::extract_video_url;

pub const DOWNLOADING_TEXT: &str = "⏳ Downloading...";
pub const EXPIRED_TEXT: &str = "⌛ This choice has expired. Send the link again.";

/// Replies with the video/audio prompt when the text carries a link; stays silent otherwise.
pub(super) async fn handle_text_message(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(url) = msg.text().and_then(extract_video_url) else {
        return Ok(());
    };

    log::info!("Link from chat {}: {}", msg.chat.id, url);

    bot.send_message(msg.chat.id, CHOICE_PROMPT)
        .reply_markup(choice_keyboard(url, &deps.url_stash))
        .await?;

    Ok(())
}

/// Runs the chosen download and reports the outcome in place of the prompt.
pub(super) async fn handle_choice_callback(bot: &Bot, q: &CallbackQuery, deps: &HandlerDeps) -> Result<(), HandlerError> {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let Some(message) = q.message.as_ref() else {
        log::warn!("Callback {:?} without a message, ignoring", data);
        return Ok(());
    };
    let chat_id = message.chat().id;
    let status_id = message.id();

    let choice = match ChoicePayload::parse(data, &deps.url_stash) {
        Ok(choice) => choice,
        Err(PayloadError::Expired(token)) => {
            log::info!("Stashed link {} expired for chat {}", token, chat_id);
            bot.edit_message_text(chat_id, status_id, EXPIRED_TEXT).await?;
            return Ok(());
        }
        Err(e) => {
            log::warn!("Ignoring callback {:?} from chat {}: {}", data, chat_id, e);
            return Ok(());
        }
    };

    log::info!("Chat {} chose {} for {}", chat_id, choice.mode, choice.url);
    bot.edit_message_text(chat_id, status_id, DOWNLOADING_TEXT).await?;

    let delivery =
        match prepare_delivery(deps.extractor.as_ref(), &choice.url, choice.mode, deps.max_upload_mb).await {
            Ok(delivery) => delivery,
            Err(e) => {
                log::error!("Download failed [{}] for {}: {}", e.subcategory(), choice.url, e);
                bot.edit_message_text(chat_id, status_id, e.user_message()).await?;
                return Ok(());
            }
        };

    match send_delivery(bot, chat_id, &delivery).await {
        Ok(_) => {
            log::info!("Delivered {} to chat {}", delivery.path.display(), chat_id);
            delete_status(bot, chat_id, status_id).await;
        }
        Err(e) => {
            log::error!("Upload of {} to chat {} failed: {}", delivery.path.display(), chat_id, e);
            let text = format!("❌ Error: upload failed: {}", e);
            if let Err(edit_err) = bot.edit_message_text(chat_id, status_id, text).await {
                log::warn!("Failed to report upload error to chat {}: {}", chat_id, edit_err);
            }
        }
    }

    remove_scratch_file(&delivery.path).await;
    Ok(())
}

async fn delete_status(bot: &Bot, chat_id: ChatId, status_id: MessageId) {
    if let Err(e) = bot.delete_message(chat_id, status_id).await {
        log::warn!("Failed to delete status message in chat {}: {}", chat_id, e);
    }
}
