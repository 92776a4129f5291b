//! Live quote state container — pipeline-owned, SDK-provided update logic.

use super::Quote;
use crate::error::FetchFailure;
use crate::shared::DataSource;
use chrono::{DateTime, Utc};

/// Last-known live quote plus freshness and error indicators.
///
/// A new quote always replaces the previous one entirely.
#[derive(Debug, Clone)]
pub struct LiveState {
    quote: Option<Quote>,
    source: Option<DataSource>,
    last_update: Option<DateTime<Utc>>,
    error: Option<FetchFailure>,
    loading: bool,
}

/// Copy of [`LiveState`] handed to the display layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveSnapshot {
    pub quote: Option<Quote>,
    pub source: Option<DataSource>,
    pub last_update: Option<DateTime<Utc>>,
    pub error: Option<FetchFailure>,
    /// A fetch is in flight. Previous data (if any) stays in `quote`.
    pub loading: bool,
}

impl Default for LiveState {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveState {
    /// Starts in the loading state: nothing fetched yet.
    pub fn new() -> Self {
        Self {
            quote: None,
            source: None,
            last_update: None,
            error: None,
            loading: true,
        }
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
    }

    /// A fetch was abandoned; whatever was stored before stays.
    pub fn abandon_fetch(&mut self) {
        self.loading = false;
    }

    /// Store a live quote and clear any previous error.
    pub fn apply_quote(&mut self, quote: Quote, at: DateTime<Utc>) {
        self.quote = Some(quote);
        self.source = Some(DataSource::Live);
        self.last_update = Some(at);
        self.error = None;
        self.loading = false;
    }

    /// Swap in fallback data after a failed fetch.
    pub fn apply_fallback(&mut self, fallback: Quote, failure: FetchFailure, at: DateTime<Utc>) {
        self.quote = Some(fallback);
        self.source = Some(DataSource::Fallback);
        self.last_update = Some(at);
        self.error = Some(failure);
        self.loading = false;
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    pub fn error(&self) -> Option<&FetchFailure> {
        self.error.as_ref()
    }

    pub fn is_fallback(&self) -> bool {
        self.source == Some(DataSource::Fallback)
    }

    pub fn snapshot(&self) -> LiveSnapshot {
        LiveSnapshot {
            quote: self.quote.clone(),
            source: self.source,
            last_update: self.last_update,
            error: self.error.clone(),
            loading: self.loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::fallback_quote;
    use crate::shared::Metal;
    use chrono::Duration;

    fn live_quote(gold: f64) -> Quote {
        let mut q = fallback_quote();
        q.metals.insert(Metal::Gold, gold);
        q
    }

    #[test]
    fn test_new_state_is_loading_and_empty() {
        let state = LiveState::new();
        let snap = state.snapshot();
        assert!(snap.loading);
        assert!(snap.quote.is_none());
        assert!(snap.last_update.is_none());
        assert!(snap.error.is_none());
    }

    #[test]
    fn test_fallback_sets_error_and_timestamp() {
        let mut state = LiveState::new();
        let now = Utc::now();
        state.apply_fallback(fallback_quote(), FetchFailure::transport("HTTP 503"), now);
        let snap = state.snapshot();
        assert_eq!(snap.quote, Some(fallback_quote()));
        assert_eq!(snap.last_update, Some(now));
        assert_eq!(snap.source, Some(DataSource::Fallback));
        assert!(snap.error.is_some());
        assert!(!snap.loading);
        assert!(state.is_fallback());
    }

    #[test]
    fn test_success_replaces_fallback_and_clears_error() {
        let mut state = LiveState::new();
        let t0 = Utc::now();
        state.apply_fallback(fallback_quote(), FetchFailure::payload("bad"), t0);
        state.begin_fetch();
        assert!(state.snapshot().loading);
        assert!(state.quote().is_some(), "data stays visible while loading");

        let t1 = t0 + Duration::seconds(60);
        state.apply_quote(live_quote(2400.0), t1);
        let snap = state.snapshot();
        assert_eq!(snap.quote.unwrap().price(Metal::Gold), Some(2400.0));
        assert_eq!(snap.source, Some(DataSource::Live));
        assert_eq!(snap.last_update, Some(t1));
        assert!(snap.error.is_none());
    }
}
