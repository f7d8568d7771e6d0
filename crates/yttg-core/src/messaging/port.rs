use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::MessagingCapabilities,
    Result,
};

/// Outbound chat port.
///
/// Implementations fail with `Error::Channel` on transport failure. Text is
/// always Telegram-flavoured HTML.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef>;

    /// Send a photo by URL with an HTML caption.
    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption_html: &str,
    ) -> Result<MessageRef>;

    /// Photo with caption, or plain HTML when the caption is over the
    /// transport's caption limit.
    async fn send_card(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption_html: &str,
    ) -> Result<MessageRef> {
        let limit = self.capabilities().max_caption_len;
        if caption_html.chars().count() > limit {
            tracing::debug!(limit, "caption too long for a photo, sending text");
            return self.send_html(chat_id, caption_html).await;
        }
        self.send_photo(chat_id, photo_url, caption_html).await
    }
}
