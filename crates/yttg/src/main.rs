use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use yttg_core::{
    config::Config,
    dispatch::{command_queue, CommandDispatcher, CommandTable},
    messaging::port::MessagingPort,
    ports::VideoSource,
    responder::CommandResponder,
    scheduler::SyncScheduler,
    seen_store::SeenStore,
    sync::SyncEngine,
};
use yttg_telegram::TelegramMessenger;
use yttg_youtube::YouTubeClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    yttg_core::logging::init("yttg")?;

    let cfg = Config::load()?;
    tracing::info!("starting yttg: {}", cfg.summary());

    let source: Arc<dyn VideoSource> = Arc::new(YouTubeClient::new(
        cfg.youtube_api_key.clone(),
        cfg.youtube_channel_id.clone(),
        cfg.http_timeout,
    )?);

    let bot = yttg_telegram::build_bot(&cfg.telegram_bot_token, cfg.http_timeout)?;
    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));

    let store = Arc::new(SeenStore::load(cfg.seen_store_path.clone()));

    let engine = Arc::new(SyncEngine::new(
        source.clone(),
        messenger.clone(),
        store,
        cfg.notify_chat_id,
        cfg.sync_max_results,
    ));
    let scheduler = SyncScheduler::new(engine, cfg.check_interval);
    scheduler.start().await;

    let responder = Arc::new(CommandResponder::new(
        source,
        messenger,
        cfg.command_list_count,
    ));
    let dispatcher = CommandDispatcher::new(CommandTable::new(cfg.command_list_count), responder);
    let (commands_tx, commands_rx) = command_queue();
    let cancel = CancellationToken::new();
    let dispatcher_task = tokio::spawn(dispatcher.run(commands_rx, cancel.clone()));

    let polled = yttg_telegram::router::run_polling(bot, commands_tx).await;

    // Ctrl-C (or a polling failure): let in-flight work finish, then exit.
    tracing::info!("shutting down");
    cancel.cancel();
    let _ = dispatcher_task.await;
    scheduler.stop().await;

    polled
}
