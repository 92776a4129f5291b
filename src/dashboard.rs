//! Display-facing query surface.
//!
//! `Dashboard` owns both pipelines and the current [`DisplaySelection`], and
//! answers every display query by running the conversion engine against the
//! latest stored data. Nothing converted is cached.

use std::sync::Arc;
use std::time::Duration;

use crate::client::DEFAULT_REFRESH_INTERVAL;
use crate::domain::history::{HistoryRow, HistorySnapshot, DEFAULT_HISTORY_DAYS};
use crate::domain::quote::LiveSnapshot;
use crate::error::SdkError;
use crate::refresh::{HistoryPipeline, LiveConfig, LivePipeline, QuoteSource};
use crate::shared::conversion::UNAVAILABLE_PLACEHOLDER;
use crate::shared::fmt::num::format_rate;
use crate::shared::{format_conversion, DisplaySelection, Metal};

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub refresh_interval: Duration,
    pub history_days: u32,
    /// Selection in effect until `set_display_selection` is called.
    pub selection: DisplaySelection,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            history_days: DEFAULT_HISTORY_DAYS,
            selection: DisplaySelection::default(),
        }
    }
}

pub struct Dashboard {
    live: LivePipeline,
    history: HistoryPipeline,
    selection: DisplaySelection,
}

impl Dashboard {
    pub fn new(source: Arc<dyn QuoteSource>, config: DashboardConfig) -> Self {
        let live = LivePipeline::new(
            Arc::clone(&source),
            LiveConfig {
                interval: config.refresh_interval,
                ..LiveConfig::default()
            },
        );
        Self {
            live,
            history: HistoryPipeline::new(source, config.history_days),
            selection: config.selection,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Start live refreshing. Must be called within a tokio runtime.
    pub fn start(&mut self) {
        self.live.start();
    }

    pub async fn stop(&mut self) {
        self.live.stop().await;
    }

    /// Activate the history view: one fetch of the recent window.
    pub async fn load_history(&mut self) -> HistorySnapshot {
        self.history.activate().await.snapshot()
    }

    /// Direct access to the live pipeline (events, `refresh_now`).
    pub fn live(&self) -> &LivePipeline {
        &self.live
    }

    // ── Selection ────────────────────────────────────────────────────────

    pub fn selection(&self) -> &DisplaySelection {
        &self.selection
    }

    /// Rejects an empty currency or an unknown unit code, keeping the
    /// previous selection.
    pub fn set_display_selection(&mut self, currency: &str, unit: &str) -> Result<(), SdkError> {
        let selection = DisplaySelection::parse(currency, unit)?;
        tracing::debug!(selection = %selection.label(), "Display selection changed");
        self.selection = selection;
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub async fn live_snapshot(&self) -> LiveSnapshot {
        self.live.snapshot().await
    }

    pub fn history(&self) -> HistorySnapshot {
        self.history.snapshot()
    }

    /// History rows under the current selection, newest first.
    pub fn history_rows(&self) -> Vec<HistoryRow> {
        self.history.rows(&self.selection)
    }

    /// Latest price of `metal` under the current selection, formatted, or
    /// `N/A` when no quote is stored or the conversion is unavailable.
    pub async fn convert_for_display(&self, metal: Metal) -> String {
        match self.live.snapshot().await.quote {
            Some(quote) => format_conversion(&quote.convert(metal, &self.selection)),
            None => UNAVAILABLE_PLACEHOLDER.to_string(),
        }
    }

    /// `1 USD = 87.6655 INR` for the current selection.
    pub async fn rate_line(&self) -> String {
        let currency = &self.selection.currency;
        let rate = self
            .live
            .snapshot()
            .await
            .quote
            .and_then(|q| q.usd_to(currency).ok())
            .map(format_rate)
            .unwrap_or_else(|| UNAVAILABLE_PLACEHOLDER.to_string());
        format!("1 USD = {} {}", rate, currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::history::{HistoryWindow, TimeSeries};
    use crate::domain::quote::{fallback_quote, Quote};
    use crate::error::HttpError;
    use crate::shared::{DataSource, MassUnit};
    use async_trait::async_trait;

    struct Down;

    #[async_trait]
    impl QuoteSource for Down {
        async fn latest(&self) -> Result<Quote, SdkError> {
            Err(HttpError::ServerError {
                status: 502,
                body: "Bad Gateway".into(),
            }
            .into())
        }

        async fn time_series(&self, _: &HistoryWindow) -> Result<TimeSeries, SdkError> {
            Err(HttpError::Timeout.into())
        }
    }

    struct Up;

    #[async_trait]
    impl QuoteSource for Up {
        async fn latest(&self) -> Result<Quote, SdkError> {
            Ok(fallback_quote())
        }

        async fn time_series(&self, _: &HistoryWindow) -> Result<TimeSeries, SdkError> {
            Ok(TimeSeries::default())
        }
    }

    #[tokio::test]
    async fn test_before_first_fetch_everything_is_placeholder() {
        let dashboard = Dashboard::new(Arc::new(Up), DashboardConfig::default());
        assert!(dashboard.live_snapshot().await.loading);
        assert_eq!(dashboard.convert_for_display(Metal::Gold).await, "N/A");
        assert_eq!(dashboard.rate_line().await, "1 USD = N/A INR");
        assert!(dashboard.history_rows().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_selection_is_inr_per_gram() {
        let mut dashboard = Dashboard::new(Arc::new(Up), DashboardConfig::default());
        dashboard.start();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(dashboard.selection().label(), "INR/g");
        assert_eq!(dashboard.convert_for_display(Metal::Gold).await, "5,709");
        assert_eq!(dashboard.rate_line().await, "1 USD = 87.6655 INR");
        dashboard.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_change_applies_to_next_query() {
        let mut dashboard = Dashboard::new(Arc::new(Up), DashboardConfig::default());
        dashboard.start();
        tokio::time::sleep(Duration::from_secs(1)).await;

        dashboard.set_display_selection("usd", "toz").unwrap();
        assert_eq!(dashboard.selection().unit, MassUnit::TroyOunce);
        assert_eq!(dashboard.convert_for_display(Metal::Gold).await, "2,026");
        assert_eq!(dashboard.convert_for_display(Metal::Silver).await, "25.75");

        assert!(dashboard.set_display_selection("EUR", "stone").is_err());
        assert_eq!(dashboard.selection().label(), "USD/toz");

        dashboard.set_display_selection("CHF", "g").unwrap();
        assert_eq!(dashboard.convert_for_display(Metal::Gold).await, "N/A");
        dashboard.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_outage_serves_fallback_everywhere() {
        let mut dashboard = Dashboard::new(Arc::new(Down), DashboardConfig::default());
        dashboard.start();
        tokio::time::sleep(Duration::from_secs(1)).await;

        let live = dashboard.live_snapshot().await;
        assert_eq!(live.source, Some(DataSource::Fallback));
        assert!(live.error.is_some());
        assert_eq!(dashboard.convert_for_display(Metal::Gold).await, "5,709");

        let history = dashboard.load_history().await;
        assert_eq!(history.source, Some(DataSource::Fallback));
        assert_eq!(dashboard.history_rows().len(), 2);
        dashboard.stop().await;
    }
}
