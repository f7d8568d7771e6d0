//! YouTube Data API v3 adapter.
//!
//! Implements the `yttg-core` `VideoSource` port over `search.list`
//! (`order=date` for latest, `order=viewCount` for top videos).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use yttg_core::{
    config::clamp_page, domain::VideoSummary, errors::Error, ports::VideoSource, Result,
};

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOrder {
    Date,
    ViewCount,
}

impl SearchOrder {
    fn as_str(self) -> &'static str {
        match self {
            SearchOrder::Date => "date",
            SearchOrder::ViewCount => "viewCount",
        }
    }
}

#[derive(Clone, Debug)]
pub struct YouTubeClient {
    api_key: String,
    channel_id: String,
    http: reqwest::Client,
}

impl YouTubeClient {
    pub fn new(
        api_key: impl Into<String>,
        channel_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Gateway(format!("youtube http client build failed: {e}")))?;
        Ok(Self {
            api_key: api_key.into(),
            channel_id: channel_id.into(),
            http,
        })
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub async fn search(&self, order: SearchOrder, max_results: u32) -> Result<Vec<VideoSummary>> {
        let max_results = clamp_page(max_results as u64).to_string();

        let resp = self
            .http
            .get(SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("channelId", self.channel_id.as_str()),
                ("maxResults", max_results.as_str()),
                ("order", order.as_str()),
                ("type", "video"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Gateway(format!("youtube request error: {}", e.without_url())))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!(
                "youtube search failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::Gateway(format!("youtube body error: {}", e.without_url())))?;
        let videos = parse_search_response(&body)?;

        tracing::debug!(
            order = order.as_str(),
            count = videos.len(),
            "youtube search completed"
        );
        Ok(videos)
    }
}

#[async_trait]
impl VideoSource for YouTubeClient {
    async fn fetch_latest(&self, max_results: u32) -> Result<Vec<VideoSummary>> {
        self.search(SearchOrder::Date, max_results).await
    }

    async fn fetch_most_viewed(&self, max_results: u32) -> Result<Vec<VideoSummary>> {
        self.search(SearchOrder::ViewCount, max_results).await
    }
}

// === search.list payload ===

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<ItemId>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    published_at: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// Map a `search.list` JSON body to videos, keeping API order.
///
/// Items without a video id (channels, playlists, malformed rows) are dropped.
pub fn parse_search_response(body: &str) -> Result<Vec<VideoSummary>> {
    let parsed: SearchResponse = serde_json::from_str(body)
        .map_err(|e| Error::Gateway(format!("youtube payload error: {e}")))?;

    let videos = parsed
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id?.video_id.filter(|v| !v.trim().is_empty())?;
            let snippet = item.snippet.unwrap_or_default();
            Some(VideoSummary {
                url: format!("https://www.youtube.com/watch?v={id}"),
                title: decode_entities(&snippet.title),
                description: decode_entities(&snippet.description),
                thumbnail_url: pick_thumbnail(snippet.thumbnails.as_ref()),
                published_at: snippet.published_at.as_deref().and_then(parse_timestamp),
                id,
            })
        })
        .collect();

    Ok(videos)
}

fn pick_thumbnail(thumbs: Option<&Thumbnails>) -> String {
    let Some(t) = thumbs else {
        return String::new();
    };
    [&t.high, &t.medium, &t.default]
        .into_iter()
        .flatten()
        .map(|th| th.url.clone())
        .next()
        .unwrap_or_default()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// `search.list` snippets come HTML-entity encoded; captions re-escape them.
fn decode_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"
{
  "kind": "youtube#searchListResponse",
  "items": [
    {
      "id": { "kind": "youtube#video", "videoId": "abc123" },
      "snippet": {
        "publishedAt": "2024-05-01T12:30:00Z",
        "title": "Rust &amp; Tokio: what&#39;s new",
        "description": "A tour",
        "thumbnails": {
          "default": { "url": "https://i.ytimg.com/vi/abc123/default.jpg" },
          "high": { "url": "https://i.ytimg.com/vi/abc123/hqdefault.jpg" }
        }
      }
    },
    {
      "id": { "kind": "youtube#channel", "channelId": "UC123" },
      "snippet": { "title": "The channel itself" }
    },
    {
      "id": { "kind": "youtube#video", "videoId": "def456" },
      "snippet": {
        "publishedAt": "not a date",
        "title": "Second",
        "thumbnails": {
          "medium": { "url": "https://i.ytimg.com/vi/def456/mqdefault.jpg" }
        }
      }
    }
  ]
}
"#;

    #[test]
    fn maps_items_in_api_order() {
        let videos = parse_search_response(SAMPLE).unwrap();
        let ids: Vec<_> = videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["abc123", "def456"]);

        let first = &videos[0];
        assert_eq!(first.title, "Rust & Tokio: what's new");
        assert_eq!(first.description, "A tour");
        assert_eq!(first.url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(
            first.thumbnail_url,
            "https://i.ytimg.com/vi/abc123/hqdefault.jpg"
        );
        assert_eq!(
            first.published_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap())
        );
    }

    #[test]
    fn falls_back_to_smaller_thumbnails_and_tolerates_bad_dates() {
        let videos = parse_search_response(SAMPLE).unwrap();
        let second = &videos[1];
        assert_eq!(
            second.thumbnail_url,
            "https://i.ytimg.com/vi/def456/mqdefault.jpg"
        );
        assert_eq!(second.published_at, None);
        assert_eq!(second.description, "");
    }

    #[test]
    fn empty_channel_is_an_empty_list() {
        assert!(parse_search_response(r#"{"items": []}"#).unwrap().is_empty());
        assert!(parse_search_response(r#"{"kind": "x"}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_payload_is_a_gateway_error() {
        let err = parse_search_response("<html>").unwrap_err();
        assert!(matches!(err, Error::Gateway(_)));
    }

    #[test]
    fn order_names_match_the_api() {
        assert_eq!(SearchOrder::Date.as_str(), "date");
        assert_eq!(SearchOrder::ViewCount.as_str(), "viewCount");
    }

    #[tokio::test]
    async fn client_builds_with_timeout() {
        let client = YouTubeClient::new("key", "UC123", Duration::from_secs(5)).unwrap();
        assert_eq!(client.channel_id(), "UC123");
    }
}
