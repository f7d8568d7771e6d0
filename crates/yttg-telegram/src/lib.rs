//! Telegram adapter (teloxide).
//!
//! Implements the `yttg-core` MessagingPort over the Telegram Bot API and feeds
//! inbound slash commands into the core command queue.

use std::time::Duration;

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{InputFile, ParseMode},
};

pub mod handlers;
pub mod router;

use yttg_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{port::MessagingPort, types::MessagingCapabilities},
    Result,
};

/// Long polling keeps `getUpdates` open for a while; never time out below this.
const MIN_BOT_TIMEOUT: Duration = Duration::from_secs(17);

/// Build a bot whose HTTP client enforces `timeout` on every request.
pub fn build_bot(token: &str, timeout: Duration) -> Result<Bot> {
    let client = teloxide::net::default_reqwest_settings()
        .timeout(timeout.max(MIN_BOT_TIMEOUT))
        .build()
        .map_err(|e| Error::Channel(format!("telegram http client build failed: {e}")))?;
    Ok(Bot::with_client(token, client))
}

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Channel(format!("telegram error: {e}"))
    }

    fn msg_ref(chat_id: ChatId, msg: &Message) -> MessageRef {
        MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: 4096,
            max_caption_len: 1024,
        }
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        let msg = self
            .bot
            .send_message(Self::tg_chat(chat_id), html.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(Self::map_err)?;

        Ok(Self::msg_ref(chat_id, &msg))
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption_html: &str,
    ) -> Result<MessageRef> {
        let url = match reqwest::Url::parse(photo_url) {
            Ok(u) => u,
            Err(e) => {
                // No usable thumbnail: the caption alone still carries the link.
                tracing::warn!(photo_url, "invalid photo url, sending text instead: {e}");
                return self.send_html(chat_id, caption_html).await;
            }
        };

        let msg = self
            .bot
            .send_photo(Self::tg_chat(chat_id), InputFile::url(url))
            .caption(caption_html.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(Self::map_err)?;

        Ok(Self::msg_ref(chat_id, &msg))
    }
}
