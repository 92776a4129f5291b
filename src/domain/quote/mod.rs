//! Quote domain — a snapshot of metal prices plus a currency-rate table.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod fallback;
pub mod state;
pub mod wire;

pub use convert::{currency_rates_from_wire, metal_prices_from_wire};
pub use fallback::fallback_quote;
pub use state::{LiveSnapshot, LiveState};

use crate::shared::{
    conversion, CurrencyCode, CurrencyRates, DisplaySelection, MassUnit, Metal, MetalPrices,
    Unavailable,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One snapshot of market state: USD per troy ounce for each metal plus the
/// currency table valid at that moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Always [`MassUnit::TroyOunce`].
    pub base_unit: MassUnit,
    pub metals: MetalPrices,
    pub currencies: CurrencyRates,
    #[serde(default)]
    pub timestamps: Option<QuoteTimestamps>,
}

/// Upstream timestamps, when the API sends parseable ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteTimestamps {
    pub metal: Option<DateTime<Utc>>,
    pub currency: Option<DateTime<Utc>>,
}

impl Quote {
    pub fn new(metals: MetalPrices, currencies: CurrencyRates) -> Self {
        Self {
            base_unit: MassUnit::TroyOunce,
            metals,
            currencies,
            timestamps: None,
        }
    }

    /// USD per troy ounce, if the metal was quoted.
    pub fn price(&self, metal: Metal) -> Option<f64> {
        self.metals.get(&metal).copied()
    }

    /// Stored rate (USD per unit of `currency`).
    pub fn rate(&self, currency: &CurrencyCode) -> Option<f64> {
        self.currencies.get(currency).copied()
    }

    /// Currency codes this quote can be shown in, sorted.
    pub fn currency_codes(&self) -> Vec<CurrencyCode> {
        self.currencies.keys().cloned().collect()
    }

    /// Units of `currency` per one USD.
    pub fn usd_to(&self, currency: &CurrencyCode) -> Result<f64, Unavailable> {
        conversion::effective_rate(&self.currencies, currency)
    }

    /// Display price for `metal` in the selected currency and unit.
    pub fn convert(&self, metal: Metal, selection: &DisplaySelection) -> Result<f64, Unavailable> {
        conversion::convert(
            self.price(metal),
            &self.currencies,
            &selection.currency,
            selection.unit,
        )
    }
}
