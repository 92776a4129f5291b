//! Pure conversion from USD per troy ounce into a display price.
//!
//! No async, no network calls, no stored selection: everything the math needs is
//! passed in. A price that cannot be computed is returned as an [`Unavailable`]
//! value rather than a `NaN`, an infinity or a panic.
//!
//! # Conversion math
//!
//! ```text
//! effective_rate = 1                      if currency == USD
//!                = 1 / rates[currency]    otherwise (rates are USD per unit of currency)
//! display_price  = price_usd_per_toz * effective_rate / unit.multiplier
//! ```

use super::fmt::num::format_price;
use super::{CurrencyCode, CurrencyRates, MassUnit};
use thiserror::Error;

/// Placeholder rendered in place of an unavailable price.
pub const UNAVAILABLE_PLACEHOLDER: &str = "N/A";

/// Why a display price could not be computed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Unavailable {
    #[error("Price not available")]
    MissingPrice,

    #[error("Invalid price {0}")]
    InvalidPrice(f64),

    #[error("Currency rate not available for {0}")]
    MissingCurrency(CurrencyCode),

    #[error("Unusable rate {rate} for {currency}")]
    InvalidRate { currency: CurrencyCode, rate: f64 },

    #[error("Unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("Conversion produced a non-finite value")]
    NonFinite,
}

/// Units of `currency` per one USD, derived from the stored rate table.
pub fn effective_rate(rates: &CurrencyRates, currency: &CurrencyCode) -> Result<f64, Unavailable> {
    let stored = rates
        .get(currency)
        .copied()
        .ok_or_else(|| Unavailable::MissingCurrency(currency.clone()))?;

    if currency.is_usd() {
        return Ok(1.0);
    }

    if !stored.is_finite() || stored <= 0.0 {
        return Err(Unavailable::InvalidRate {
            currency: currency.clone(),
            rate: stored,
        });
    }

    Ok(1.0 / stored)
}

/// Convert a USD-per-troy-ounce price into `currency` per `unit`.
pub fn convert(
    price_per_toz: Option<f64>,
    rates: &CurrencyRates,
    currency: &CurrencyCode,
    unit: MassUnit,
) -> Result<f64, Unavailable> {
    let price = price_per_toz.ok_or(Unavailable::MissingPrice)?;
    if !price.is_finite() || price < 0.0 {
        return Err(Unavailable::InvalidPrice(price));
    }

    let rate = effective_rate(rates, currency)?;
    let value = price * rate / unit.multiplier();

    if value.is_finite() {
        Ok(value)
    } else {
        Err(Unavailable::NonFinite)
    }
}

/// Same as [`convert`], taking raw currency and unit codes.
pub fn convert_codes(
    price_per_toz: Option<f64>,
    rates: &CurrencyRates,
    currency: &str,
    unit: &str,
) -> Result<f64, Unavailable> {
    let unit = unit
        .parse::<MassUnit>()
        .map_err(|_| Unavailable::UnknownUnit(unit.to_string()))?;
    convert(price_per_toz, rates, &CurrencyCode::new(currency), unit)
}

/// Render a conversion result, using [`UNAVAILABLE_PLACEHOLDER`] for gaps.
pub fn format_conversion(result: &Result<f64, Unavailable>) -> String {
    match result {
        Ok(value) => format_price(*value),
        Err(_) => UNAVAILABLE_PLACEHOLDER.to_string(),
    }
}
