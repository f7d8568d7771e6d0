use crate::domain::{ChatId, UserId};

/// Inbound slash command, already split into name and arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncomingCommand {
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    /// Lower-cased, without the leading `/` or an `@botname` suffix.
    pub name: String,
    pub args: String,
}

impl IncomingCommand {
    /// Parse a message text such as `/top@my_bot 10`.
    ///
    /// Returns `None` for anything that is not a slash command.
    pub fn parse(chat_id: ChatId, text: &str) -> Option<Self> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;

        let mut parts = rest.splitn(2, char::is_whitespace);
        let first = parts.next().unwrap_or("").trim();
        let args = parts.next().unwrap_or("").trim().to_string();

        let name = first.split('@').next().unwrap_or("").to_lowercase();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            chat_id,
            user_id: None,
            username: None,
            name,
            args,
        })
    }

    pub fn with_sender(mut self, user_id: Option<UserId>, username: Option<String>) -> Self {
        self.user_id = user_id;
        self.username = username;
        self
    }
}

/// Size limits of a messenger implementation, in characters.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub max_message_len: usize,
    pub max_caption_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_with_bot_suffix_and_args() {
        let cmd = IncomingCommand::parse(ChatId(7), "/Top@yt_bot  10 ").unwrap();
        assert_eq!(cmd.name, "top");
        assert_eq!(cmd.args, "10");
        assert_eq!(cmd.chat_id, ChatId(7));
    }

    #[test]
    fn ignores_plain_text_and_bare_slash() {
        assert!(IncomingCommand::parse(ChatId(1), "hello /latest").is_none());
        assert!(IncomingCommand::parse(ChatId(1), "/").is_none());
        assert!(IncomingCommand::parse(ChatId(1), "/@bot").is_none());
    }

    #[test]
    fn keeps_latest5_distinct_from_latest() {
        let cmd = IncomingCommand::parse(ChatId(1), "/latest5").unwrap();
        assert_eq!(cmd.name, "latest5");
        assert!(cmd.args.is_empty());
    }
}
