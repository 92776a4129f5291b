//! History sub-client — daily time-series queries.

use crate::client::BullionClient;
use crate::domain::history::{HistoryWindow, TimeSeries};
use crate::error::SdkError;
use chrono::Utc;

/// Sub-client for time-series operations.
pub struct History<'a> {
    pub(crate) client: &'a BullionClient,
}

impl<'a> History<'a> {
    /// Daily quotes for an explicit window.
    pub async fn get(&self, window: &HistoryWindow) -> Result<TimeSeries, SdkError> {
        let resp = self
            .client
            .http
            .get_timeseries(window, &self.client.metals)
            .await?;
        Ok(TimeSeries::try_from(resp)?)
    }

    /// The configured rolling window ending today (UTC).
    pub async fn recent(&self) -> Result<TimeSeries, SdkError> {
        let window = HistoryWindow::ending(Utc::now().date_naive(), self.client.history_days);
        self.get(&window).await
    }
}
