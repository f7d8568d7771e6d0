//! Formatting utilities (video captions, Telegram HTML).

use crate::domain::VideoSummary;

/// Descriptions longer than this (in characters) are cut and suffixed with `...`.
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Separator between captions in combined list messages.
pub const CAPTION_SEPARATOR: &str = "\n\n";

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Cut `description` to `max_chars` characters, appending `...` when cut.
pub fn truncate_description(description: &str, max_chars: usize) -> String {
    if description.chars().count() <= max_chars {
        return description.to_string();
    }
    let head: String = description.chars().take(max_chars).collect();
    format!("{head}...")
}

/// HTML caption used both for new-video notifications and command replies.
pub fn video_caption(video: &VideoSummary) -> String {
    format!(
        "🎬 <b>New video published</b>\n\n<b>{}</b>\n\n{}\n\n🔗 <a href=\"{}\">Watch on YouTube</a>",
        escape_html(&video.title),
        escape_html(&truncate_description(
            &video.description,
            DESCRIPTION_MAX_CHARS
        )),
        escape_html(&video.url),
    )
}

/// Join captions into as few messages as fit under `limit` bytes.
///
/// Messages only break between captions; a caption that alone exceeds the
/// limit is emitted as its own message.
pub fn pack_captions(captions: &[String], limit: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for caption in captions {
        if current.is_empty() {
            current.push_str(caption);
            continue;
        }
        if current.len() + CAPTION_SEPARATOR.len() + caption.len() > limit {
            out.push(std::mem::take(&mut current));
            current.push_str(caption);
        } else {
            current.push_str(CAPTION_SEPARATOR);
            current.push_str(caption);
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}
