//! History state container — pipeline-owned, SDK-provided update logic.

use super::{HistoryRow, TimeSeries};
use crate::error::FetchFailure;
use crate::shared::{DataSource, DisplaySelection};
use chrono::{DateTime, Utc};

/// Where a history activation stands. The three states are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryStatus {
    Loading,
    Ready(TimeSeries),
    Failed {
        error: FetchFailure,
        fallback: TimeSeries,
    },
}

/// Result of the latest history activation.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState {
    status: HistoryStatus,
    updated_at: Option<DateTime<Utc>>,
}

/// Copy of [`HistoryState`] handed to the display layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub series: Option<TimeSeries>,
    pub error: Option<FetchFailure>,
    pub source: Option<DataSource>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryState {
    pub fn new() -> Self {
        Self {
            status: HistoryStatus::Loading,
            updated_at: None,
        }
    }

    /// Store a fetched series verbatim.
    pub fn apply_series(&mut self, series: TimeSeries, at: DateTime<Utc>) {
        self.status = HistoryStatus::Ready(series);
        self.updated_at = Some(at);
    }

    /// Record a failed activation together with the series to show instead.
    pub fn apply_fallback(&mut self, fallback: TimeSeries, error: FetchFailure, at: DateTime<Utc>) {
        self.status = HistoryStatus::Failed { error, fallback };
        self.updated_at = Some(at);
    }

    pub fn status(&self) -> &HistoryStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, HistoryStatus::Loading)
    }

    /// The series to present: real data, fallback data, or nothing yet.
    pub fn series(&self) -> Option<&TimeSeries> {
        match &self.status {
            HistoryStatus::Loading => None,
            HistoryStatus::Ready(series) => Some(series),
            HistoryStatus::Failed { fallback, .. } => Some(fallback),
        }
    }

    pub fn error(&self) -> Option<&FetchFailure> {
        match &self.status {
            HistoryStatus::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Presentation rows, newest first. Empty while loading.
    pub fn rows(&self, selection: &DisplaySelection) -> Vec<HistoryRow> {
        self.series()
            .map(|series| series.rows(selection))
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        let source = match self.status {
            HistoryStatus::Loading => None,
            HistoryStatus::Ready(_) => Some(DataSource::Live),
            HistoryStatus::Failed { .. } => Some(DataSource::Fallback),
        };
        HistorySnapshot {
            series: self.series().cloned(),
            error: self.error().cloned(),
            source,
            updated_at: self.updated_at,
        }
    }
}
