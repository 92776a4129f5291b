//! Refresh pipelines: where quotes come from and what happens when they don't.
//!
//! - [`QuoteSource`] — the fetch seam, implemented by `BullionClient` and by test fakes
//! - [`settle`] — maps a fetch outcome to live data or fallback data plus an error indicator
//! - [`live::LivePipeline`] — periodic background refresh of the latest quote
//! - [`history::HistoryPipeline`] — one-shot fetch of the recent daily series

pub mod history;
pub mod live;

pub use history::HistoryPipeline;
pub use live::{LiveConfig, LiveEvent, LivePipeline};

use crate::client::BullionClient;
use crate::domain::history::{HistoryWindow, TimeSeries};
use crate::domain::quote::Quote;
use crate::error::{FetchFailure, SdkError};
use async_trait::async_trait;

/// Anything that can produce quotes.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Latest quote.
    async fn latest(&self) -> Result<Quote, SdkError>;

    /// Daily quotes within `window`.
    async fn time_series(&self, window: &HistoryWindow) -> Result<TimeSeries, SdkError>;
}

#[async_trait]
impl QuoteSource for BullionClient {
    async fn latest(&self) -> Result<Quote, SdkError> {
        self.quotes().latest().await
    }

    async fn time_series(&self, window: &HistoryWindow) -> Result<TimeSeries, SdkError> {
        self.history().get(window).await
    }
}

/// Outcome of a fetch after the fallback rule has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled<T> {
    Live(T),
    Fallback { data: T, failure: FetchFailure },
}

impl<T> Settled<T> {
    pub fn data(&self) -> &T {
        match self {
            Settled::Live(data) | Settled::Fallback { data, .. } => data,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Settled::Live(_) => None,
            Settled::Fallback { failure, .. } => Some(failure),
        }
    }
}

/// Success passes through untouched. Any failure, transport or payload,
/// yields `fallback()` together with the failure.
pub fn settle<T>(
    context: &'static str,
    result: Result<T, SdkError>,
    fallback: impl FnOnce() -> T,
) -> Settled<T> {
    match result {
        Ok(data) => Settled::Live(data),
        Err(e) => {
            let failure = FetchFailure::from(&e);
            tracing::warn!(
                context,
                kind = ?failure.kind,
                error = %e,
                "Fetch failed; serving fallback data"
            );
            Settled::Fallback {
                data: fallback(),
                failure,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureKind, HttpError, PayloadError};

    #[test]
    fn test_settle_success_is_untouched() {
        let settled = settle("test", Ok(7), || 0);
        assert_eq!(settled, Settled::Live(7));
        assert!(settled.failure().is_none());
    }

    #[test]
    fn test_settle_transport_failure() {
        let err = SdkError::Http(HttpError::ServerError {
            status: 503,
            body: "unavailable".into(),
        });
        let settled = settle("test", Err(err), || 42);
        assert_eq!(*settled.data(), 42);
        assert_eq!(settled.failure().unwrap().kind, FailureKind::Transport);
    }

    #[test]
    fn test_settle_payload_failure() {
        let err = SdkError::Payload(PayloadError::MissingField("metals"));
        let settled = settle("test", Err(err), || 42);
        assert_eq!(*settled.data(), 42);
        assert_eq!(settled.failure().unwrap().kind, FailureKind::Payload);
    }
}
