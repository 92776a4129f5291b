//! History pipeline — one fetch per activation, no timer.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use super::{settle, QuoteSource, Settled};
use crate::domain::history::{
    fallback_series, HistoryRow, HistorySnapshot, HistoryState, HistoryWindow,
    DEFAULT_HISTORY_DAYS,
};
use crate::shared::DisplaySelection;

pub struct HistoryPipeline {
    source: Arc<dyn QuoteSource>,
    days: u32,
    state: HistoryState,
}

impl HistoryPipeline {
    pub fn new(source: Arc<dyn QuoteSource>, days: u32) -> Self {
        Self {
            source,
            days: days.max(1),
            state: HistoryState::new(),
        }
    }

    pub fn with_default_window(source: Arc<dyn QuoteSource>) -> Self {
        Self::new(source, DEFAULT_HISTORY_DAYS)
    }

    /// Fetch the window ending today (UTC).
    pub async fn activate(&mut self) -> &HistoryState {
        self.activate_on(Utc::now().date_naive()).await
    }

    /// Fetch the window ending on `today`. Replaces whatever the previous
    /// activation left behind.
    pub async fn activate_on(&mut self, today: NaiveDate) -> &HistoryState {
        let window = HistoryWindow::ending(today, self.days);
        tracing::debug!(start = %window.start, end = %window.end, "Loading history");

        self.state = HistoryState::new();
        let result = self.source.time_series(&window).await;
        let now = Utc::now();

        match settle("history", result, fallback_series) {
            Settled::Live(series) => {
                tracing::info!(days = series.len(), "History loaded");
                self.state.apply_series(series, now);
            }
            Settled::Fallback { data, failure } => {
                self.state.apply_fallback(data, failure, now);
            }
        }
        &self.state
    }

    pub fn state(&self) -> &HistoryState {
        &self.state
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        self.state.snapshot()
    }

    pub fn rows(&self, selection: &DisplaySelection) -> Vec<HistoryRow> {
        self.state.rows(selection)
    }
}
