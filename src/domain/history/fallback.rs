//! Fixed two-day series shown when a history fetch fails.

use super::TimeSeries;
use crate::domain::quote::Quote;
use crate::shared::serde_util::parse_calendar_date;
use crate::shared::{CurrencyCode, Metal};

/// (date, [gold, silver, platinum], INR per USD)
///
/// EUR and GBP are the same on both days.
const FALLBACK_DAYS: [(&str, [f64; 3], f64); 2] = [
    ("2024-01-20", [2025.5, 25.75, 1015.3], 83.15),
    ("2024-01-19", [2020.25, 25.5, 1010.75], 83.2),
];

const EUR_PER_USD: f64 = 0.92;
const GBP_PER_USD: f64 = 0.79;

/// The degraded-mode series.
///
/// Rates are stored in the upstream convention (USD per unit of currency), so
/// the "per USD" sample figures are inverted here.
pub fn fallback_series() -> TimeSeries {
    let days = FALLBACK_DAYS
        .into_iter()
        .filter_map(|(raw, [gold, silver, platinum], inr_per_usd)| {
            let date = parse_calendar_date(raw)?;
            let metals = [
                (Metal::Gold, gold),
                (Metal::Silver, silver),
                (Metal::Platinum, platinum),
            ]
            .into_iter()
            .collect();
            let currencies = [
                ("USD", 1.0),
                ("INR", 1.0 / inr_per_usd),
                ("EUR", 1.0 / EUR_PER_USD),
                ("GBP", 1.0 / GBP_PER_USD),
            ]
            .into_iter()
            .map(|(code, rate)| (CurrencyCode::from(code), rate))
            .collect();
            Some((date, Quote::new(metals, currencies)))
        })
        .collect();

    TimeSeries::new(days)
}
