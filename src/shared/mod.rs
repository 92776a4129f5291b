//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the metals API sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod conversion;
pub mod fmt;
pub mod serde_util;

pub use conversion::{convert, convert_codes, effective_rate, format_conversion, Unavailable};

use crate::error::SdkError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Metal → USD per troy ounce. A missing key means "unavailable".
pub type MetalPrices = BTreeMap<Metal, f64>;

/// Currency → USD per one unit of that currency (`USD` is stored as `1`).
pub type CurrencyRates = BTreeMap<CurrencyCode, f64>;

// ─── Metal ───────────────────────────────────────────────────────────────────

/// The closed set of metals the API is queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metal {
    Gold,
    Silver,
    Platinum,
}

impl Metal {
    pub const ALL: [Metal; 3] = [Metal::Gold, Metal::Silver, Metal::Platinum];

    /// Identifier used in requests and response keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Platinum => "platinum",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Platinum => "Platinum",
        }
    }
}

impl std::fmt::Display for Metal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Metal {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metal::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SdkError::Validation(format!("Unknown metal '{}'", s)))
    }
}

/// Comma-separated metal list for the `metals` query parameter.
pub fn metals_param(metals: &[Metal]) -> String {
    metals
        .iter()
        .map(Metal::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

// ─── CurrencyCode ────────────────────────────────────────────────────────────

/// Newtype for ISO-style currency codes (e.g. `"INR"`). Always upper case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(s: impl Into<String>) -> Self {
        let s: String = s.into();
        Self(s.trim().to_ascii_uppercase())
    }

    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn is_usd(&self) -> bool {
        self.0 == "USD"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CurrencyCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(CurrencyCode::new(s))
    }
}

// ─── MassUnit ────────────────────────────────────────────────────────────────

/// Supported mass units. The troy ounce is the base unit of every quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MassUnit {
    #[default]
    #[serde(rename = "toz")]
    TroyOunce,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "lb")]
    Pound,
}

impl MassUnit {
    pub const ALL: [MassUnit; 4] = [
        MassUnit::TroyOunce,
        MassUnit::Gram,
        MassUnit::Kilogram,
        MassUnit::Pound,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::TroyOunce => "toz",
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Pound => "lb",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TroyOunce => "Troy Ounce",
            Self::Gram => "Gram",
            Self::Kilogram => "Kilogram",
            Self::Pound => "Pound",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::TroyOunce => "oz",
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Pound => "lb",
        }
    }

    /// How many of this unit equal one troy ounce. Never zero.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::TroyOunce => 1.0,
            Self::Gram => 31.1035,
            Self::Kilogram => 0.0311035,
            Self::Pound => 0.06857,
        }
    }
}

impl std::fmt::Display for MassUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for MassUnit {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MassUnit::ALL
            .into_iter()
            .find(|u| u.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SdkError::Validation(format!("Unknown unit '{}'", s)))
    }
}

// ─── DisplaySelection ────────────────────────────────────────────────────────

/// Currency + unit the caller wants prices shown in.
///
/// Defaults to Indian rupees per gram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySelection {
    pub currency: CurrencyCode,
    pub unit: MassUnit,
}

impl DisplaySelection {
    pub fn new(currency: impl Into<CurrencyCode>, unit: MassUnit) -> Self {
        Self {
            currency: currency.into(),
            unit,
        }
    }

    /// Build from raw codes. An empty currency or unknown unit is rejected.
    pub fn parse(currency: &str, unit: &str) -> Result<Self, SdkError> {
        let currency = CurrencyCode::new(currency);
        if currency.as_str().is_empty() {
            return Err(SdkError::Validation("Currency code is empty".to_string()));
        }
        Ok(Self {
            currency,
            unit: unit.parse()?,
        })
    }

    /// Label such as `INR/g`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.currency, self.unit.code())
    }
}

impl Default for DisplaySelection {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::new("INR"),
            unit: MassUnit::Gram,
        }
    }
}

// ─── DataSource ──────────────────────────────────────────────────────────────

/// Where the data currently held in a state slot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSource {
    Live,
    Fallback,
}
