//! Wire types for the `timeseries` endpoint.

use crate::shared::serde_util::lenient_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Raw `/timeseries` response.
///
/// `rates` is keyed by the upstream date string and is absent on failure.
/// Ordered so that conversion visits keys deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub rates: Option<BTreeMap<String, DayEntry>>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// One day of the series: that day's own currency table and metal prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayEntry {
    #[serde(default, deserialize_with = "lenient_date::deserialize", skip_serializing)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub currencies: Option<HashMap<String, Option<f64>>>,
    #[serde(default)]
    pub metals: Option<HashMap<String, Option<f64>>>,
}
