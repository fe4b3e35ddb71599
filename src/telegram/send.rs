//! Uploading a finished download back to the chat

use teloxide::prelude::*;
use teloxide::types::InputFile;

use crate::download::{Delivery, DownloadMode};

/// Sends the file: audio as a playable track, video as a document so
/// Telegram does not recompress it.
pub async fn send_delivery(bot: &Bot, chat_id: ChatId, delivery: &Delivery) -> ResponseResult<Message> {
    log::info!(
        "Uploading {} ({:.1} MB) to chat {}",
        delivery.path.display(),
        delivery.size_mb(),
        chat_id
    );

    match delivery.mode {
        DownloadMode::Audio => {
            bot.send_audio(chat_id, InputFile::file(delivery.path.clone()))
                .title(delivery.title.clone())
                .caption(delivery.caption())
                .await
        }
        DownloadMode::Video => {
            let file = InputFile::file(delivery.path.clone()).file_name(delivery.file_name());
            bot.send_document(chat_id, file).caption(delivery.caption()).await
        }
    }
}
