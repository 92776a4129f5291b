//! Conversion: TimeSeriesResponse → TimeSeries.

use super::wire::{DayEntry, TimeSeriesResponse};
use super::TimeSeries;
use crate::domain::quote::wire::SUCCESS_STATUS;
use crate::domain::quote::{currency_rates_from_wire, metal_prices_from_wire, Quote};
use crate::error::PayloadError;
use crate::shared::serde_util::{parse_calendar_date, DATE_FORMAT};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

impl TryFrom<TimeSeriesResponse> for TimeSeries {
    type Error = PayloadError;

    fn try_from(source: TimeSeriesResponse) -> Result<Self, Self::Error> {
        if let Some(status) = source.status.filter(|s| s != SUCCESS_STATUS) {
            return Err(PayloadError::Failure {
                status,
                code: source.error_code,
                message: source
                    .error_message
                    .unwrap_or_else(|| "API request failed".to_string()),
            });
        }

        let rates = source.rates.ok_or(PayloadError::MissingField("rates"))?;

        let mut days = BTreeMap::new();
        for (key, entry) in rates {
            let Some(date) = parse_calendar_date(&key).or(entry.date) else {
                tracing::warn!(key = %key, "Skipping time-series entry with unparseable date");
                continue;
            };
            // Two keys naming one day: the zero-padded `YYYY-MM-DD` key wins.
            let canonical = key == date.format(DATE_FORMAT).to_string();
            match days.entry(date) {
                Entry::Vacant(slot) => {
                    slot.insert(Quote::from(entry));
                }
                Entry::Occupied(mut slot) => {
                    tracing::warn!(%date, key = %key, canonical, "Duplicate time-series date");
                    if canonical {
                        slot.insert(Quote::from(entry));
                    }
                }
            }
        }

        Ok(TimeSeries::new(days))
    }
}

impl From<DayEntry> for Quote {
    fn from(entry: DayEntry) -> Self {
        Quote::new(
            metal_prices_from_wire(entry.metals.unwrap_or_default()),
            currency_rates_from_wire(entry.currencies.unwrap_or_default()),
        )
    }
}
