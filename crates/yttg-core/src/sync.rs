//! New-video detection and delivery.
//!
//! One `run_cycle()` call = fetch latest → diff against the seen-set → notify
//! each unseen video in source order → record it. The first cycle of a process
//! only records the current videos (baseline snapshot) so a restart never
//! floods the chat.

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crate::{
    domain::{ChatId, VideoSummary},
    formatting::video_caption,
    messaging::port::MessagingPort,
    ports::VideoSource,
    seen_store::SeenStore,
    Result,
};

/// Outcome of a successful cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleReport {
    /// First cycle of the process: `recorded` ids were newly added, nothing was sent.
    Bootstrapped { fetched: usize, recorded: usize },
    /// Notifications went out for these ids, in order.
    Delivered { notified: Vec<String> },
    /// Nothing new.
    Idle { fetched: usize },
}

pub struct SyncEngine {
    source: Arc<dyn VideoSource>,
    messenger: Arc<dyn MessagingPort>,
    store: Arc<SeenStore>,
    chat_id: ChatId,
    max_results: u32,
    bootstrapped: AtomicBool,
}

impl SyncEngine {
    pub fn new(
        source: Arc<dyn VideoSource>,
        messenger: Arc<dyn MessagingPort>,
        store: Arc<SeenStore>,
        chat_id: ChatId,
        max_results: u32,
    ) -> Self {
        Self {
            source,
            messenger,
            store,
            chat_id,
            max_results,
            bootstrapped: AtomicBool::new(false),
        }
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped.load(Ordering::SeqCst)
    }

    pub fn store(&self) -> &Arc<SeenStore> {
        &self.store
    }

    /// Run one detection-and-delivery cycle.
    ///
    /// Callers must not overlap invocations (the scheduler serializes them).
    /// On error, ids already recorded earlier in the cycle stay recorded.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        tracing::info!(max_results = self.max_results, "checking for new videos");
        let latest = self.source.fetch_latest(self.max_results).await?;

        if !self.is_bootstrapped() {
            let recorded = self
                .store
                .mark_all_seen(latest.iter().map(|v| v.id.as_str()))
                .await;
            self.bootstrapped.store(true, Ordering::SeqCst);
            tracing::info!(
                fetched = latest.len(),
                recorded,
                "baseline snapshot recorded, no notifications sent"
            );
            return Ok(CycleReport::Bootstrapped {
                fetched: latest.len(),
                recorded,
            });
        }

        let fresh = self.unseen(latest.clone()).await;
        if fresh.is_empty() {
            tracing::debug!(fetched = latest.len(), "no new videos");
            return Ok(CycleReport::Idle {
                fetched: latest.len(),
            });
        }

        tracing::info!(count = fresh.len(), "found new videos");
        let mut notified = Vec::with_capacity(fresh.len());
        for video in fresh {
            self.notify(&video).await?;
            self.store.mark_seen(&video.id).await;
            tracing::info!(video_id = %video.id, "notification sent");
            notified.push(video.id);
        }

        Ok(CycleReport::Delivered { notified })
    }

    /// Videos not yet in the seen-set, in source order, each id at most once.
    async fn unseen(&self, videos: Vec<VideoSummary>) -> Vec<VideoSummary> {
        let mut taken = HashSet::new();
        let mut out = Vec::new();
        for v in videos {
            if taken.contains(&v.id) || self.store.is_seen(&v.id).await {
                continue;
            }
            taken.insert(v.id.clone());
            out.push(v);
        }
        out
    }

    async fn notify(&self, video: &VideoSummary) -> Result<()> {
        let caption = video_caption(video);
        self.messenger
            .send_card(self.chat_id, &video.thumbnail_url, &caption)
            .await
            .map_err(|e| {
                tracing::error!(video_id = %video.id, "failed to send notification: {e}");
                e
            })?;
        Ok(())
    }
}
