//! On-demand chat commands: help, latest, latest N, top N.
//!
//! Handlers only read through the video source and reply to the requesting
//! chat. Failures never escape `respond()`: they are logged and the user gets a
//! generic apology (best-effort).

use std::sync::Arc;

use crate::{
    domain::ChatId,
    formatting::{escape_html, pack_captions, video_caption},
    messaging::port::MessagingPort,
    ports::VideoSource,
    Result,
};

pub const NO_VIDEOS: &str = "No videos found.";
pub const NO_TOP_VIDEOS: &str = "No top videos found.";
pub const GENERIC_FAILURE: &str =
    "⚠️ Something went wrong while fetching videos. Please try again later.";

/// What a resolved command asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandRoute {
    Help,
    Latest,
    LatestN(u32),
    Top(u32),
    Unknown(String),
}

pub struct CommandResponder {
    source: Arc<dyn VideoSource>,
    messenger: Arc<dyn MessagingPort>,
    default_count: u32,
}

impl CommandResponder {
    pub fn new(
        source: Arc<dyn VideoSource>,
        messenger: Arc<dyn MessagingPort>,
        default_count: u32,
    ) -> Self {
        Self {
            source,
            messenger,
            default_count,
        }
    }

    /// Handle one command end to end. Never fails.
    pub async fn respond(&self, chat_id: ChatId, route: CommandRoute) {
        let label = route_label(&route);
        let res = match route {
            CommandRoute::Help => self.help(chat_id).await,
            CommandRoute::Latest => self.latest(chat_id).await,
            CommandRoute::LatestN(n) => self.latest_n(chat_id, n).await,
            CommandRoute::Top(n) => self.top(chat_id, n).await,
            CommandRoute::Unknown(name) => self.unknown(chat_id, &name).await,
        };

        match res {
            Ok(()) => tracing::info!(chat_id = chat_id.0, command = label, "command processed"),
            Err(e) => {
                tracing::error!(chat_id = chat_id.0, command = label, "command failed: {e}");
                if let Err(send_e) = self.messenger.send_html(chat_id, GENERIC_FAILURE).await {
                    tracing::warn!(chat_id = chat_id.0, "could not report failure: {send_e}");
                }
            }
        }
    }

    pub async fn help(&self, chat_id: ChatId) -> Result<()> {
        self.messenger
            .send_html(chat_id, &help_text(self.default_count))
            .await?;
        Ok(())
    }

    /// Newest video as a photo with caption.
    pub async fn latest(&self, chat_id: ChatId) -> Result<()> {
        let videos = self.source.fetch_latest(1).await?;
        let Some(video) = videos.first() else {
            self.messenger.send_html(chat_id, NO_VIDEOS).await?;
            return Ok(());
        };

        self.messenger
            .send_card(chat_id, &video.thumbnail_url, &video_caption(video))
            .await?;
        Ok(())
    }

    /// Newest `n` videos as combined text (no photos).
    pub async fn latest_n(&self, chat_id: ChatId, n: u32) -> Result<()> {
        let videos = self.source.fetch_latest(n).await?;
        self.send_list(chat_id, &videos, NO_VIDEOS).await
    }

    /// Most-viewed `n` videos as combined text (no photos).
    pub async fn top(&self, chat_id: ChatId, n: u32) -> Result<()> {
        let videos = self.source.fetch_most_viewed(n).await?;
        self.send_list(chat_id, &videos, NO_TOP_VIDEOS).await
    }

    async fn unknown(&self, chat_id: ChatId, name: &str) -> Result<()> {
        let msg = format!(
            "Unknown command: /{}. Send /help for the list of commands.",
            escape_html(name)
        );
        self.messenger.send_html(chat_id, &msg).await?;
        Ok(())
    }

    async fn send_list(
        &self,
        chat_id: ChatId,
        videos: &[crate::domain::VideoSummary],
        empty_text: &str,
    ) -> Result<()> {
        if videos.is_empty() {
            self.messenger.send_html(chat_id, empty_text).await?;
            return Ok(());
        }

        let captions: Vec<String> = videos.iter().map(video_caption).collect();
        let limit = self.messenger.capabilities().max_message_len;
        for chunk in pack_captions(&captions, limit) {
            self.messenger.send_html(chat_id, &chunk).await?;
        }
        Ok(())
    }
}

fn route_label(route: &CommandRoute) -> &'static str {
    match route {
        CommandRoute::Help => "help",
        CommandRoute::Latest => "latest",
        CommandRoute::LatestN(_) => "latest_n",
        CommandRoute::Top(_) => "top",
        CommandRoute::Unknown(_) => "unknown",
    }
}

pub fn help_text(default_count: u32) -> String {
    format!(
        "🤖 <b>Available Commands</b>\n\n\
/help - Show this help message\n\
/latest - Show the latest video\n\
/latest5 - Show the latest 5 videos\n\
/latestn [n] - Show the latest n videos (default {default_count})\n\
/top [n] - Show the most viewed videos (default {default_count})"
    )
}
