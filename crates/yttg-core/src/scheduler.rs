//! Timer that drives the sync engine.
//!
//! - first tick fires immediately (baseline snapshot at startup)
//! - one loop task awaits each cycle, so cycles never overlap
//! - ticks missed while a cycle runs are skipped, not queued

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::sync::{CycleReport, SyncEngine};

#[derive(Clone, Debug, Default)]
pub struct SchedulerStatus {
    pub running: bool,
    pub cycles_completed: u64,
    pub cycles_failed: u64,
    pub last_report: Option<CycleReport>,
    pub last_error: Option<String>,
}

#[derive(Clone)]
pub struct SyncScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    engine: Arc<SyncEngine>,
    interval: Duration,
    state: tokio::sync::Mutex<SchedulerState>,
}

#[derive(Default)]
struct SchedulerState {
    task: Option<JoinHandle<()>>,
    cancel: Option<CancellationToken>,
    cycles_completed: u64,
    cycles_failed: u64,
    last_report: Option<CycleReport>,
    last_error: Option<String>,
}

impl SyncScheduler {
    pub fn new(engine: Arc<SyncEngine>, interval: Duration) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                engine,
                interval,
                state: tokio::sync::Mutex::new(SchedulerState::default()),
            }),
        }
    }

    /// Spawn the loop. Calling `start()` on a running scheduler is a no-op.
    pub async fn start(&self) {
        let mut st = self.inner.state.lock().await;
        if st.task.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        st.cancel = Some(cancel.clone());
        let scheduler = self.clone();
        st.task = Some(tokio::spawn(async move {
            scheduler.run_loop(cancel).await;
        }));

        tracing::info!(
            interval_secs = self.inner.interval.as_secs(),
            "sync scheduler started"
        );
    }

    /// Cancel the loop and wait for an in-flight cycle to finish.
    pub async fn stop(&self) {
        let (cancel, task) = {
            let mut st = self.inner.state.lock().await;
            (st.cancel.take(), st.task.take())
        };
        if let Some(tok) = cancel {
            tok.cancel();
        }
        if let Some(task) = task {
            let _ = task.await;
            tracing::info!("sync scheduler stopped");
        }
    }

    pub async fn status(&self) -> SchedulerStatus {
        let st = self.inner.state.lock().await;
        SchedulerStatus {
            running: st.task.is_some(),
            cycles_completed: st.cycles_completed,
            cycles_failed: st.cycles_failed,
            last_report: st.last_report.clone(),
            last_error: st.last_error.clone(),
        }
    }

    async fn run_loop(&self, cancel: CancellationToken) {
        let mut tick = tokio::time::interval(self.inner.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
              biased;
              _ = cancel.cancelled() => break,
              _ = tick.tick() => {
                // Not raced against `cancel`: a started cycle always completes.
                self.run_once().await;
              }
            }
        }
    }

    async fn run_once(&self) {
        let res = self.inner.engine.run_cycle().await;

        let mut st = self.inner.state.lock().await;
        match res {
            Ok(report) => {
                st.cycles_completed += 1;
                st.last_report = Some(report);
                st.last_error = None;
            }
            Err(e) => {
                tracing::error!("sync cycle failed: {e}");
                st.cycles_failed += 1;
                st.last_error = Some(e.to_string());
            }
        }
    }
}
