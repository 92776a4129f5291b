//! # Bullion SDK
//!
//! Live and historical precious-metal spot prices, converted into any quoted
//! currency and mass unit, with fixed fallback data when the upstream API is
//! unavailable.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Metals, currencies, units, the conversion engine, domain models
//! 2. **HTTP API** — `MetalsHttp` with a configurable retry policy
//! 3. **High-Level Client** — `BullionClient` with nested sub-clients
//! 4. **Refresh** — `LivePipeline` (tokio timer task) and `HistoryPipeline`
//! 5. **Dashboard** — display selection plus formatted queries over both pipelines
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bullion::prelude::*;
//!
//! let client = BullionClient::from_env().build()?;
//! let quote = client.quotes().latest().await?;
//!
//! let mut dashboard = client.into_dashboard(DisplaySelection::default());
//! dashboard.start();
//! println!("Gold: {}", dashboard.convert_for_display(Metal::Gold).await);
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared types and the conversion engine.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: High-Level Client ───────────────────────────────────────────────

/// `BullionClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 4: Refresh ─────────────────────────────────────────────────────────

/// Live and history pipelines with fallback substitution.
#[cfg(feature = "native")]
pub mod refresh;

// ── Layer 5: Dashboard ───────────────────────────────────────────────────────

/// Display-facing query surface.
#[cfg(feature = "native")]
pub mod dashboard;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared types + conversion engine
    pub use crate::shared::{
        convert, convert_codes, effective_rate, format_conversion, CurrencyCode, CurrencyRates,
        DataSource, DisplaySelection, MassUnit, Metal, MetalPrices, Unavailable,
    };
    pub use crate::shared::fmt::num::{format_price, format_rate};

    // Domain types — quote
    pub use crate::domain::quote::{fallback_quote, LiveSnapshot, LiveState, Quote};

    // Domain types — history
    pub use crate::domain::history::{
        fallback_series, HistoryRow, HistorySnapshot, HistoryState, HistoryStatus,
        HistoryWindow, TimeSeries,
    };

    // Errors
    pub use crate::error::{FailureKind, FetchFailure, HttpError, PayloadError, SdkError};

    // Network
    pub use crate::network::DEFAULT_API_URL;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{BullionClient, BullionClientBuilder, HistoryClient, QuotesClient};
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // Refresh + dashboard
    #[cfg(feature = "native")]
    pub use crate::dashboard::{Dashboard, DashboardConfig};
    #[cfg(feature = "native")]
    pub use crate::refresh::{
        HistoryPipeline, LiveConfig, LiveEvent, LivePipeline, QuoteSource, Settled,
    };
}
