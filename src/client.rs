//! High-level client — `BullionClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared configuration, and accessor methods.

use crate::domain::history::client::History;
use crate::domain::history::DEFAULT_HISTORY_DAYS;
use crate::domain::quote::client::Quotes;
use crate::error::SdkError;
use crate::http::{MetalsHttp, RetryPolicy};
use crate::network::{API_KEY_ENV, API_URL_ENV, DEFAULT_API_URL};
use crate::shared::Metal;

use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::history::client::History as HistoryClient;
pub use crate::domain::quote::client::Quotes as QuotesClient;

/// Default period between live refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// The primary entry point for the SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.quotes()`, `client.history()`.
#[derive(Debug, Clone)]
pub struct BullionClient {
    pub(crate) http: MetalsHttp,
    pub(crate) metals: Vec<Metal>,
    pub(crate) refresh_interval: Duration,
    pub(crate) history_days: u32,
}

impl BullionClient {
    pub fn builder() -> BullionClientBuilder {
        BullionClientBuilder::default()
    }

    /// Builder seeded from `METALS_DEV_API_KEY` / `METALS_DEV_API_URL`.
    pub fn from_env() -> BullionClientBuilder {
        BullionClientBuilder::from_env()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn quotes(&self) -> Quotes<'_> {
        Quotes { client: self }
    }

    pub fn history(&self) -> History<'_> {
        History { client: self }
    }

    // ── Configuration ────────────────────────────────────────────────────

    pub fn metals(&self) -> &[Metal] {
        &self.metals
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn history_days(&self) -> u32 {
        self.history_days
    }

    /// Dashboard driven by this client, using its interval and window length.
    #[cfg(feature = "native")]
    pub fn into_dashboard(
        self,
        selection: crate::shared::DisplaySelection,
    ) -> crate::dashboard::Dashboard {
        let config = crate::dashboard::DashboardConfig {
            refresh_interval: self.refresh_interval,
            history_days: self.history_days,
            selection,
        };
        crate::dashboard::Dashboard::new(std::sync::Arc::new(self), config)
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct BullionClientBuilder {
    base_url: String,
    api_key: Option<String>,
    retry_policy: RetryPolicy,
    metals: Vec<Metal>,
    refresh_interval: Duration,
    history_days: u32,
}

impl Default for BullionClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            retry_policy: RetryPolicy::None,
            metals: Metal::ALL.to_vec(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            history_days: DEFAULT_HISTORY_DAYS,
        }
    }
}

impl BullionClientBuilder {
    pub fn from_env() -> Self {
        let mut builder = Self::default();
        if let Some(key) = env_var(API_KEY_ENV) {
            builder.api_key = Some(key);
        }
        if let Some(url) = env_var(API_URL_ENV) {
            builder.base_url = url;
        }
        builder
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn metals(mut self, metals: &[Metal]) -> Self {
        self.metals = metals.to_vec();
        self
    }

    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn history_days(mut self, days: u32) -> Self {
        self.history_days = days;
        self
    }

    pub fn build(self) -> Result<BullionClient, SdkError> {
        if self.metals.is_empty() {
            return Err(SdkError::Validation("at least one metal is required".into()));
        }
        if self.history_days == 0 {
            return Err(SdkError::Validation("history_days must be at least 1".into()));
        }
        if self.refresh_interval.is_zero() {
            return Err(SdkError::Validation("refresh_interval must be non-zero".into()));
        }
        if self.api_key.is_none() {
            tracing::warn!("No API key configured; requests will be rejected upstream");
        }

        let mut metals = self.metals;
        metals.sort();
        metals.dedup();

        Ok(BullionClient {
            http: MetalsHttp::new(&self.base_url, self.api_key, self.retry_policy)?,
            metals,
            refresh_interval: self.refresh_interval,
            history_days: self.history_days,
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
