//! History domain — a short rolling window of daily quotes.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod fallback;
pub mod state;
pub mod wire;

pub use fallback::fallback_series;
pub use state::{HistorySnapshot, HistoryState, HistoryStatus};

use crate::domain::quote::Quote;
use crate::shared::fmt::num::format_price;
use crate::shared::serde_util::DATE_FORMAT;
use crate::shared::{CurrencyCode, DisplaySelection, Metal, Unavailable};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default window length in days (end date inclusive, start = end − days).
pub const DEFAULT_HISTORY_DAYS: u32 = 5;

// ─── HistoryWindow ───────────────────────────────────────────────────────────

/// Calendar window requested from the time-series endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HistoryWindow {
    /// Window ending on `end` (inclusive) and starting `days` earlier.
    pub fn ending(end: NaiveDate, days: u32) -> Self {
        let start = end
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

// ─── TimeSeries ──────────────────────────────────────────────────────────────

/// Daily quotes keyed by calendar date.
///
/// Keys are real dates, so ordering is by calendar value and each day appears
/// at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    days: BTreeMap<NaiveDate, Quote>,
}

impl TimeSeries {
    pub fn new(days: BTreeMap<NaiveDate, Quote>) -> Self {
        Self { days }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&Quote> {
        self.days.get(date)
    }

    /// Most recent day first.
    pub fn newest_first(&self) -> impl Iterator<Item = (&NaiveDate, &Quote)> {
        self.days.iter().rev()
    }

    /// Currencies offered by the earliest day, for a currency picker.
    pub fn available_currencies(&self) -> Vec<CurrencyCode> {
        self.days
            .values()
            .next()
            .map(Quote::currency_codes)
            .unwrap_or_default()
    }

    /// One presentation row per day, most recent first.
    pub fn rows(&self, selection: &DisplaySelection) -> Vec<HistoryRow> {
        self.newest_first()
            .map(|(date, quote)| HistoryRow::build(*date, quote, selection))
            .collect()
    }
}

// ─── HistoryRow ──────────────────────────────────────────────────────────────

/// A converted day, or a day that cannot be shown in the selected currency.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryRow {
    Priced {
        date: NaiveDate,
        /// Units of the selected currency per USD on that day.
        usd_rate: f64,
        prices: BTreeMap<Metal, Result<f64, Unavailable>>,
    },
    CurrencyUnavailable {
        date: NaiveDate,
        currency: CurrencyCode,
        available: Vec<CurrencyCode>,
    },
}

impl HistoryRow {
    fn build(date: NaiveDate, quote: &Quote, selection: &DisplaySelection) -> Self {
        let usd_rate = match quote.usd_to(&selection.currency) {
            Ok(rate) => rate,
            Err(reason) => {
                tracing::warn!(%date, currency = %selection.currency, %reason, "No usable rate for day");
                return HistoryRow::CurrencyUnavailable {
                    date,
                    currency: selection.currency.clone(),
                    available: quote.currency_codes(),
                };
            }
        };

        let prices = Metal::ALL
            .into_iter()
            .map(|metal| (metal, quote.convert(metal, selection)))
            .collect();

        HistoryRow::Priced {
            date,
            usd_rate,
            prices,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            HistoryRow::Priced { date, .. } | HistoryRow::CurrencyUnavailable { date, .. } => *date,
        }
    }

    /// Formatted price for `metal`, `N/A` when unavailable.
    pub fn display_price(&self, metal: Metal) -> String {
        match self {
            HistoryRow::Priced { prices, .. } => match prices.get(&metal) {
                Some(Ok(value)) => format_price(*value),
                _ => crate::shared::conversion::UNAVAILABLE_PLACEHOLDER.to_string(),
            },
            HistoryRow::CurrencyUnavailable { .. } => {
                crate::shared::conversion::UNAVAILABLE_PLACEHOLDER.to_string()
            }
        }
    }
}
