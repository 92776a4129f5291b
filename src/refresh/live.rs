//! Live pipeline — periodic refresh of the latest quote on a tokio task.
//!
//! - Immediate fetch on start, then one fetch per interval
//! - Failures swap in the fallback quote; the next tick tries again
//! - `refresh_now()` for an out-of-band fetch that leaves the cadence alone
//! - Stream-based event delivery to the consumer

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_lock::RwLock;
use chrono::{DateTime, TimeDelta, Utc};
use futures_util::stream::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::{settle, QuoteSource, Settled};
use crate::client::DEFAULT_REFRESH_INTERVAL;
use crate::domain::quote::{fallback_quote, LiveSnapshot, LiveState};
use crate::error::SdkError;

/// Grace period for the task to exit on `stop()` before it is aborted.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Config & events ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LiveConfig {
    pub interval: Duration,
    /// Buffered events; further events are dropped until the consumer catches up.
    pub event_capacity: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            event_capacity: 64,
        }
    }
}

/// Emitted after every refresh attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    /// A live quote was stored.
    Updated(LiveSnapshot),
    /// The fetch failed and the fallback quote was stored.
    Fallback(LiveSnapshot),
}

impl LiveEvent {
    pub fn snapshot(&self) -> &LiveSnapshot {
        match self {
            LiveEvent::Updated(s) | LiveEvent::Fallback(s) => s,
        }
    }
}

// ─── Commands from public API to background task ─────────────────────────────

enum Command {
    RefreshNow,
    Stop,
}

// ─── Background task state ───────────────────────────────────────────────────

struct TaskState {
    source: Arc<dyn QuoteSource>,
    state: Arc<RwLock<LiveState>>,
    event_tx: mpsc::Sender<LiveEvent>,
    cmd_rx: mpsc::Receiver<Command>,
    interval: Duration,
    clock: TaskClock,
}

/// Wall-clock time anchored once, then advanced by the tokio clock, so
/// freshness timestamps follow the same time source as the interval.
struct TaskClock {
    wall: DateTime<Utc>,
    started: Instant,
}

impl TaskClock {
    fn start() -> Self {
        Self {
            wall: Utc::now(),
            started: Instant::now(),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.started.elapsed()).unwrap_or(TimeDelta::zero());
        self.wall + elapsed
    }
}

impl TaskState {
    fn emit(&self, event: LiveEvent) {
        if self.event_tx.try_send(event).is_err() {
            tracing::debug!("Live event dropped (channel full or closed)");
        }
    }
}

// ─── Public LivePipeline ─────────────────────────────────────────────────────

/// Keeps a [`LiveState`] fresh from a [`QuoteSource`].
///
/// The timer lives on a background tokio task; the public API talks to it
/// over an mpsc channel. Dropping the pipeline aborts the task.
pub struct LivePipeline {
    source: Arc<dyn QuoteSource>,
    config: LiveConfig,
    state: Arc<RwLock<LiveState>>,
    cmd_tx: Option<mpsc::Sender<Command>>,
    event_rx: tokio::sync::Mutex<mpsc::Receiver<LiveEvent>>,
    event_tx: mpsc::Sender<LiveEvent>,
    task_handle: Option<JoinHandle<()>>,
}

impl LivePipeline {
    /// Create a pipeline in the loading state. Does not fetch yet.
    pub fn new(source: Arc<dyn QuoteSource>, config: LiveConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(config.event_capacity.max(1));
        Self {
            source,
            config,
            state: Arc::new(RwLock::new(LiveState::new())),
            cmd_tx: None,
            event_rx: tokio::sync::Mutex::new(event_rx),
            event_tx,
            task_handle: None,
        }
    }

    /// Spawn the refresh task. The first fetch happens immediately.
    ///
    /// No-op when already running. Must be called within a tokio runtime.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        self.cmd_tx = Some(cmd_tx);

        let task = TaskState {
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
            event_tx: self.event_tx.clone(),
            cmd_rx,
            interval: self.config.interval,
            clock: TaskClock::start(),
        };

        tracing::info!(interval_secs = self.config.interval.as_secs(), "Live pipeline started");
        self.task_handle = Some(tokio::spawn(run_task(task)));
    }

    /// Stop the refresh task. No fetch starts after this returns.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(Command::Stop).await;
        }

        let Some(mut handle) = self.task_handle.take() else {
            return;
        };
        if tokio::time::timeout(STOP_TIMEOUT, &mut handle).await.is_err() {
            tracing::warn!("Live task did not stop in time; aborting");
            handle.abort();
        }

        self.state.write().await.abandon_fetch();
        tracing::info!("Live pipeline stopped");
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Ask the task for an extra fetch.
    pub fn refresh_now(&self) -> Result<(), SdkError> {
        match &self.cmd_tx {
            Some(tx) => tx.try_send(Command::RefreshNow).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => {
                    SdkError::Other("Refresh already queued".into())
                }
                mpsc::error::TrySendError::Closed(_) => {
                    SdkError::Other("Live pipeline is not running".into())
                }
            }),
            None => Err(SdkError::Other("Live pipeline is not running".into())),
        }
    }

    pub async fn snapshot(&self) -> LiveSnapshot {
        self.state.read().await.snapshot()
    }

    /// Get a stream of refresh events.
    ///
    /// The returned stream borrows `self`, so it must be dropped
    /// before calling `stop()`.
    pub fn events(&self) -> Pin<Box<dyn Stream<Item = LiveEvent> + Send + '_>> {
        Box::pin(futures_util::stream::unfold(
            &self.event_rx,
            |rx| async move {
                let mut guard = rx.lock().await;
                guard.recv().await.map(|event| (event, rx))
            },
        ))
    }
}

impl Drop for LivePipeline {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task(mut task: TaskState) {
    let mut ticker = tokio::time::interval(task.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            cmd = task.cmd_rx.recv() => match cmd {
                Some(Command::RefreshNow) => {
                    if !refresh(&mut task).await {
                        return;
                    }
                }
                Some(Command::Stop) | None => return,
            },

            _ = ticker.tick() => {
                if !refresh(&mut task).await {
                    return;
                }
            }
        }
    }
}

/// One fetch-classify-store-emit cycle. Returns `false` if stopped mid-fetch,
/// in which case nothing is stored.
async fn refresh(task: &mut TaskState) -> bool {
    task.state.write().await.begin_fetch();

    let result = {
        let fetch = task.source.latest();
        tokio::pin!(fetch);
        loop {
            tokio::select! {
                biased;

                cmd = task.cmd_rx.recv() => match cmd {
                    // Already fetching.
                    Some(Command::RefreshNow) => continue,
                    Some(Command::Stop) | None => return false,
                },

                result = &mut fetch => break result,
            }
        }
    };

    let now = task.clock.now();
    let event = {
        let mut state = task.state.write().await;
        match settle("live", result, fallback_quote) {
            Settled::Live(quote) => {
                state.apply_quote(quote, now);
                tracing::info!("Live quote refreshed");
                LiveEvent::Updated(state.snapshot())
            }
            Settled::Fallback { data, failure } => {
                state.apply_fallback(data, failure, now);
                LiveEvent::Fallback(state.snapshot())
            }
        }
    };
    task.emit(event);
    true
}
