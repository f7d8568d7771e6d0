use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use yttg_core::dispatch::CommandSender;

use crate::handlers;

/// Long-poll Telegram until Ctrl-C, pushing slash commands into `commands`.
pub async fn run_polling(bot: Bot, commands: CommandSender) -> anyhow::Result<()> {
    match bot.get_me().await {
        Ok(me) => tracing::info!("telegram bot started: @{}", me.username()),
        Err(e) => tracing::warn!("telegram getMe failed: {e}"),
    }

    let handler = Update::filter_message().endpoint(handlers::handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![commands])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
