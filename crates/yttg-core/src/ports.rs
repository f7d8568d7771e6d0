use async_trait::async_trait;

use crate::{domain::VideoSummary, Result};

/// Port over the video platform's listing queries.
///
/// Both queries return videos in the platform's order (newest-first for
/// `fetch_latest`, most-viewed-first for `fetch_most_viewed`). An empty channel
/// is an empty list, not an error; transport/auth/quota problems are
/// `Error::Gateway`.
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn fetch_latest(&self, max_results: u32) -> Result<Vec<VideoSummary>>;

    async fn fetch_most_viewed(&self, max_results: u32) -> Result<Vec<VideoSummary>>;
}
