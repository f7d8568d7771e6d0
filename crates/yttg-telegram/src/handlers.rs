//! Inbound Telegram updates.
//!
//! Handlers never run commands themselves: they parse slash commands and
//! enqueue them for the core dispatcher.

use teloxide::prelude::*;

use yttg_core::{
    dispatch::CommandSender,
    domain::{ChatId, UserId},
    messaging::types::IncomingCommand,
};

pub async fn handle_message(msg: Message, commands: CommandSender) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(cmd) = IncomingCommand::parse(ChatId(msg.chat.id.0), text) else {
        return Ok(());
    };

    let user = msg.from();
    let cmd = cmd.with_sender(
        user.map(|u| UserId(u.id.0 as i64)),
        user.and_then(|u| u.username.clone()),
    );

    if let Err(e) = commands.send(cmd).await {
        tracing::warn!("command queue closed, dropping /{}", e.0.name);
    }
    Ok(())
}
