//! In-memory port implementations for unit tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageId, MessageRef, VideoSummary},
    errors::Error,
    messaging::{port::MessagingPort, types::MessagingCapabilities},
    ports::VideoSource,
    Result,
};

pub fn video(id: &str) -> VideoSummary {
    VideoSummary {
        id: id.to_string(),
        title: format!("Title {id}"),
        description: format!("About {id}"),
        thumbnail_url: format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"),
        published_at: None,
        url: format!("https://www.youtube.com/watch?v={id}"),
    }
}

pub fn videos(ids: &[&str]) -> Vec<VideoSummary> {
    ids.iter().map(|id| video(id)).collect()
}

#[derive(Default)]
pub struct FakeSource {
    latest: Mutex<Vec<VideoSummary>>,
    most_viewed: Mutex<Vec<VideoSummary>>,
    fail: Mutex<bool>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requested: Mutex<Vec<u32>>,
}

impl FakeSource {
    pub fn with_latest(videos: Vec<VideoSummary>) -> Self {
        let s = Self::default();
        s.set_latest(videos);
        s
    }

    pub fn set_latest(&self, videos: Vec<VideoSummary>) {
        *self.latest.lock().unwrap() = videos;
    }

    pub fn set_most_viewed(&self, videos: Vec<VideoSummary>) {
        *self.most_viewed.lock().unwrap() = videos;
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// `max_results` of every call, in order.
    pub fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }

    async fn fetch(&self, list: &Mutex<Vec<VideoSummary>>, max: u32) -> Result<Vec<VideoSummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(max);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if *self.fail.lock().unwrap() {
            return Err(Error::Gateway("quota exceeded".to_string()));
        }
        let all = list.lock().unwrap().clone();
        Ok(all.into_iter().take(max as usize).collect())
    }
}

#[async_trait]
impl VideoSource for FakeSource {
    async fn fetch_latest(&self, max_results: u32) -> Result<Vec<VideoSummary>> {
        self.fetch(&self.latest, max_results).await
    }

    async fn fetch_most_viewed(&self, max_results: u32) -> Result<Vec<VideoSummary>> {
        self.fetch(&self.most_viewed, max_results).await
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sent {
    Html {
        chat_id: ChatId,
        html: String,
    },
    Photo {
        chat_id: ChatId,
        photo_url: String,
        caption: String,
    },
}

pub struct FakeMessenger {
    next_id: Mutex<i32>,
    sent: Mutex<Vec<Sent>>,
    /// Fail every call once this many messages have gone out.
    fail_after: Mutex<Option<usize>>,
    max_message_len: usize,
    max_caption_len: usize,
}

impl Default for FakeMessenger {
    fn default() -> Self {
        Self::with_limit(4096)
    }
}

impl FakeMessenger {
    pub fn with_limit(max_message_len: usize) -> Self {
        Self {
            next_id: Mutex::new(1),
            sent: Mutex::new(Vec::new()),
            fail_after: Mutex::new(None),
            max_message_len,
            max_caption_len: 1024,
        }
    }

    pub fn with_caption_limit(mut self, max_caption_len: usize) -> Self {
        self.max_caption_len = max_caption_len;
        self
    }

    pub fn fail_after(&self, n: usize) {
        *self.fail_after.lock().unwrap() = Some(n);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn photos(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Photo { photo_url, .. } => Some(photo_url),
                Sent::Html { .. } => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Html { html, .. } => Some(html),
                Sent::Photo { .. } => None,
            })
            .collect()
    }

    fn record(&self, chat_id: ChatId, item: Sent) -> Result<MessageRef> {
        let mut sent = self.sent.lock().unwrap();
        if let Some(limit) = *self.fail_after.lock().unwrap() {
            if sent.len() >= limit {
                return Err(Error::Channel("telegram unavailable".to_string()));
            }
        }
        sent.push(item);

        let mut guard = self.next_id.lock().unwrap();
        let id = *guard;
        *guard += 1;
        Ok(MessageRef {
            chat_id,
            message_id: MessageId(id),
        })
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: self.max_message_len,
            max_caption_len: self.max_caption_len,
        }
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        self.record(
            chat_id,
            Sent::Html {
                chat_id,
                html: html.to_string(),
            },
        )
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption_html: &str,
    ) -> Result<MessageRef> {
        self.record(
            chat_id,
            Sent::Photo {
                chat_id,
                photo_url: photo_url.to_string(),
                caption: caption_html.to_string(),
            },
        )
    }
}
