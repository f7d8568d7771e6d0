use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{domain::ChatId, errors::Error, Result};

/// Hard upper bound for YouTube `search.list` page sizes.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Typed runtime configuration.
#[derive(Clone, Debug)]
pub struct Config {
    // YouTube
    pub youtube_api_key: String,
    pub youtube_channel_id: String,

    // Telegram
    pub telegram_bot_token: String,
    /// Destination for new-video notifications.
    pub notify_chat_id: ChatId,

    // Sync
    pub check_interval: Duration,
    pub sync_max_results: u32,
    pub seen_store_path: PathBuf,

    // Commands
    pub command_list_count: u32,

    // Transport
    pub http_timeout: Duration,
}

impl Config {
    /// Load from the process environment, after applying an optional `.env`
    /// file in the working directory.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let youtube_api_key = required(&lookup, "YOUTUBE_API_KEY")?;
        let youtube_channel_id = required(&lookup, "YOUTUBE_CHANNEL_ID")?;
        let telegram_bot_token = required(&lookup, "TELEGRAM_BOT_TOKEN")?;

        let chat_id = parse_chat_id("TELEGRAM_CHAT_ID", &required(&lookup, "TELEGRAM_CHAT_ID")?)?;
        // Optional channel destination wins over the plain chat id.
        let notify_chat_id = match lookup("TELEGRAM_CHANEL_ID").and_then(non_empty) {
            Some(raw) => parse_chat_id("TELEGRAM_CHANEL_ID", &raw)?,
            None => chat_id,
        };

        let check_minutes = parse_u64(&lookup, "CHECK_INTERVAL")?.unwrap_or(5);
        if check_minutes == 0 {
            return Err(Error::Config(
                "CHECK_INTERVAL must be greater than zero".to_string(),
            ));
        }

        let sync_max_results = clamp_page(parse_u64(&lookup, "SYNC_MAX_RESULTS")?.unwrap_or(10));
        let command_list_count =
            clamp_page(parse_u64(&lookup, "COMMAND_LIST_COUNT")?.unwrap_or(5));

        let seen_store_path = lookup("SEEN_STORE_PATH")
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data").join("processed_videos.json"));

        let http_timeout =
            Duration::from_secs(parse_u64(&lookup, "HTTP_TIMEOUT_SECS")?.unwrap_or(15).max(1));

        Ok(Self {
            youtube_api_key,
            youtube_channel_id,
            telegram_bot_token,
            notify_chat_id,
            check_interval: Duration::from_secs(check_minutes * 60),
            sync_max_results,
            seen_store_path,
            command_list_count,
            http_timeout,
        })
    }

    /// One-line, secret-free description for the startup log.
    pub fn summary(&self) -> String {
        format!(
            "channel={} chat={} interval={}m max_results={} list_count={} store={} youtube_key={} bot_token={}",
            self.youtube_channel_id,
            self.notify_chat_id.0,
            self.check_interval.as_secs() / 60,
            self.sync_max_results,
            self.command_list_count,
            self.seen_store_path.display(),
            mask(&self.youtube_api_key),
            mask(&self.telegram_bot_token),
        )
    }
}

/// Clamp a requested page size into the range the platform accepts.
pub fn clamp_page(n: u64) -> u32 {
    n.clamp(1, MAX_PAGE_SIZE as u64) as u32
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .and_then(non_empty)
        .ok_or_else(|| Error::Config(format!("{key} environment variable is required")))
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    let Some(raw) = lookup(key).and_then(non_empty) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| Error::Config(format!("{key} must be a non-negative integer, got {raw:?}")))
}

fn parse_chat_id(key: &str, raw: &str) -> Result<ChatId> {
    raw.trim()
        .parse::<i64>()
        .map(ChatId)
        .map_err(|_| Error::Config(format!("{key} must be a numeric chat id, got {raw:?}")))
}

fn mask(secret: &str) -> String {
    let n = secret.chars().count();
    if n <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(n - 4).collect();
    format!("****{tail}")
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim().trim_start_matches("export ").trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
