//! Inbound command queue and routing table.
//!
//! The transport only pushes parsed `IncomingCommand`s into the queue; the
//! dispatcher owns the name → route table and runs each command on its own
//! task so slow replies never block the queue.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    config::clamp_page,
    messaging::types::IncomingCommand,
    responder::{CommandResponder, CommandRoute},
};

/// Queue capacity between the chat listener and the dispatcher.
pub const COMMAND_QUEUE_CAPACITY: usize = 64;

pub type CommandSender = mpsc::Sender<IncomingCommand>;
pub type CommandReceiver = mpsc::Receiver<IncomingCommand>;

pub fn command_queue() -> (CommandSender, CommandReceiver) {
    mpsc::channel(COMMAND_QUEUE_CAPACITY)
}

#[derive(Clone, Copy, Debug)]
enum RouteKind {
    Help,
    Latest,
    LatestFixed(u32),
    LatestN,
    Top,
}

/// Exact-name lookup from command to route.
#[derive(Clone, Debug)]
pub struct CommandTable {
    routes: HashMap<&'static str, RouteKind>,
    default_count: u32,
}

impl CommandTable {
    pub fn new(default_count: u32) -> Self {
        let routes = HashMap::from([
            ("help", RouteKind::Help),
            ("start", RouteKind::Help),
            ("latest", RouteKind::Latest),
            ("latest5", RouteKind::LatestFixed(5)),
            ("latestn", RouteKind::LatestN),
            ("top", RouteKind::Top),
        ]);
        Self {
            routes,
            default_count: clamp_page(default_count as u64),
        }
    }

    pub fn resolve(&self, cmd: &IncomingCommand) -> CommandRoute {
        let Some(kind) = self.routes.get(cmd.name.as_str()) else {
            return CommandRoute::Unknown(cmd.name.clone());
        };
        let count = parse_count(&cmd.args);

        match *kind {
            RouteKind::Help => CommandRoute::Help,
            RouteKind::Latest => match count {
                Some(n) => CommandRoute::LatestN(n),
                None => CommandRoute::Latest,
            },
            RouteKind::LatestFixed(n) => CommandRoute::LatestN(n),
            RouteKind::LatestN => CommandRoute::LatestN(count.unwrap_or(self.default_count)),
            RouteKind::Top => CommandRoute::Top(count.unwrap_or(self.default_count)),
        }
    }
}

/// First whitespace-separated argument as a page size, if numeric.
fn parse_count(args: &str) -> Option<u32> {
    let first = args.split_whitespace().next()?;
    first.parse::<u64>().ok().map(clamp_page)
}

pub struct CommandDispatcher {
    table: CommandTable,
    responder: Arc<CommandResponder>,
}

impl CommandDispatcher {
    pub fn new(table: CommandTable, responder: Arc<CommandResponder>) -> Self {
        Self { table, responder }
    }

    /// Consume the queue until it closes or `cancel` fires, then wait for
    /// in-flight handlers.
    pub async fn run(self, mut rx: CommandReceiver, cancel: CancellationToken) {
        let mut handlers = JoinSet::new();

        loop {
            let cmd = tokio::select! {
              biased;
              _ = cancel.cancelled() => break,
              cmd = rx.recv() => cmd,
            };
            let Some(cmd) = cmd else {
                break;
            };

            let route = self.table.resolve(&cmd);
            tracing::debug!(
                chat_id = cmd.chat_id.0,
                user_id = cmd.user_id.map(|u| u.0),
                user = cmd.username.as_deref().unwrap_or("unknown"),
                command = %cmd.name,
                "dispatching command"
            );

            let responder = self.responder.clone();
            handlers.spawn(async move {
                responder.respond(cmd.chat_id, route).await;
            });

            // Reap finished handlers so the set does not grow unbounded.
            while handlers.try_join_next().is_some() {}
        }

        while handlers.join_next().await.is_some() {}
        tracing::info!("command dispatcher stopped");
    }
}
