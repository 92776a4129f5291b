//! Wire types for the `latest` endpoint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `status` value of a successful response.
pub const SUCCESS_STATUS: &str = "success";

/// Raw `/latest` response.
///
/// Every field except `status` is optional: failure responses carry only
/// `status`, `error_code` and `error_message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestResponse {
    pub status: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub metals: Option<HashMap<String, Option<f64>>>,
    #[serde(default)]
    pub currencies: Option<HashMap<String, Option<f64>>>,
    #[serde(default)]
    pub timestamps: Option<QuoteTimestampsWire>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Upstream timestamps for the metal and currency legs of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteTimestampsWire {
    #[serde(default)]
    pub metal: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}
