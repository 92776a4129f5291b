//! Conversion: LatestResponse → Quote (TryFrom + validation).

use super::wire::{LatestResponse, QuoteTimestampsWire, SUCCESS_STATUS};
use super::{Quote, QuoteTimestamps};
use crate::error::PayloadError;
use crate::shared::{CurrencyCode, CurrencyRates, MassUnit, Metal, MetalPrices};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

impl TryFrom<LatestResponse> for Quote {
    type Error = PayloadError;

    fn try_from(source: LatestResponse) -> Result<Self, Self::Error> {
        if source.status != SUCCESS_STATUS {
            return Err(PayloadError::Failure {
                status: source.status,
                code: source.error_code,
                message: source
                    .error_message
                    .unwrap_or_else(|| "API request failed".to_string()),
            });
        }

        if let Some(currency) = source.currency.filter(|c| !c.eq_ignore_ascii_case("USD")) {
            return Err(PayloadError::UnexpectedBasis {
                field: "currency",
                value: currency,
                expected: "USD",
            });
        }
        if let Some(unit) = source.unit.filter(|u| u != MassUnit::TroyOunce.code()) {
            return Err(PayloadError::UnexpectedBasis {
                field: "unit",
                value: unit,
                expected: "toz",
            });
        }

        let metals = source.metals.ok_or(PayloadError::MissingField("metals"))?;
        let currencies = source
            .currencies
            .ok_or(PayloadError::MissingField("currencies"))?;

        Ok(Quote {
            timestamps: source.timestamps.map(QuoteTimestamps::from),
            ..Quote::new(
                metal_prices_from_wire(metals),
                currency_rates_from_wire(currencies),
            )
        })
    }
}

impl From<QuoteTimestampsWire> for QuoteTimestamps {
    fn from(t: QuoteTimestampsWire) -> Self {
        Self {
            metal: t.metal.as_deref().and_then(parse_timestamp),
            currency: t.currency.as_deref().and_then(parse_timestamp),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Keep the metals we know, dropping nulls and prices that are negative or
/// not finite (an absent price reads as "unavailable", never as zero).
pub fn metal_prices_from_wire(raw: HashMap<String, Option<f64>>) -> MetalPrices {
    raw.into_iter()
        .filter_map(|(key, value)| {
            let metal = key.parse::<Metal>().ok()?;
            match value {
                Some(price) if price.is_finite() && price >= 0.0 => Some((metal, price)),
                Some(price) => {
                    tracing::warn!(%metal, price, "Dropping invalid metal price");
                    None
                }
                None => None,
            }
        })
        .collect()
}

/// Normalize currency codes and pin `USD` to exactly `1`.
pub fn currency_rates_from_wire(raw: HashMap<String, Option<f64>>) -> CurrencyRates {
    let mut rates: CurrencyRates = raw
        .into_iter()
        .filter_map(|(code, rate)| Some((CurrencyCode::new(code), rate?)))
        .collect();

    if let Some(usd) = rates.get_mut(&CurrencyCode::usd()) {
        if *usd != 1.0 {
            tracing::warn!(rate = *usd, "USD rate is not 1; pinning to 1");
            *usd = 1.0;
        }
    }
    rates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> LatestResponse {
        serde_json::from_str(json).unwrap()
    }

    const SUCCESS: &str = r#"{
        "status": "success",
        "currency": "USD",
        "unit": "toz",
        "metals": {"gold": 2331.2, "silver": 29.5, "platinum": null, "palladium": 1000.0},
        "currencies": {"USD": 1, "INR": 0.011975, "eur": 1.0841},
        "timestamps": {"metal": "2024-05-20T10:15:03.451Z", "currency": "2024-05-20T10:14:00Z"}
    }"#;

    #[test]
    fn test_success_response_conversion() {
        let quote = Quote::try_from(parse(SUCCESS)).unwrap();
        assert_eq!(quote.base_unit, MassUnit::TroyOunce);
        assert_eq!(quote.price(Metal::Gold), Some(2331.2));
        assert_eq!(quote.price(Metal::Silver), Some(29.5));
        assert_eq!(quote.price(Metal::Platinum), None);
        assert_eq!(quote.metals.len(), 2);
        assert_eq!(quote.rate(&CurrencyCode::from("EUR")), Some(1.0841));
        let ts = quote.timestamps.unwrap();
        assert!(ts.metal.is_some());
        assert!(ts.currency.is_some());
    }

    #[test]
    fn test_failure_status_surfaces_error_message() {
        let resp = parse(
            r#"{"status":"failure","error_code":1101,"error_message":"Invalid API key"}"#,
        );
        let err = Quote::try_from(resp).unwrap_err();
        assert_eq!(
            err,
            PayloadError::Failure {
                status: "failure".to_string(),
                code: Some(1101),
                message: "Invalid API key".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_tables_are_payload_errors() {
        let err = Quote::try_from(parse(r#"{"status":"success","currencies":{}}"#)).unwrap_err();
        assert_eq!(err, PayloadError::MissingField("metals"));
        let err = Quote::try_from(parse(r#"{"status":"success","metals":{}}"#)).unwrap_err();
        assert_eq!(err, PayloadError::MissingField("currencies"));
    }

    #[test]
    fn test_non_usd_basis_rejected() {
        let err = Quote::try_from(parse(
            r#"{"status":"success","currency":"EUR","metals":{},"currencies":{}}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, PayloadError::UnexpectedBasis { field: "currency", .. }));
    }

    #[test]
    fn test_negative_price_dropped_and_usd_pinned() {
        let prices = metal_prices_from_wire(HashMap::from([
            ("gold".to_string(), Some(-5.0)),
            ("silver".to_string(), Some(0.0)),
        ]));
        assert_eq!(prices.get(&Metal::Gold), None);
        assert_eq!(prices.get(&Metal::Silver), Some(&0.0));

        let rates = currency_rates_from_wire(HashMap::from([
            ("USD".to_string(), Some(0.999)),
            ("GBP".to_string(), None),
        ]));
        assert_eq!(rates.get(&CurrencyCode::usd()), Some(&1.0));
        assert!(!rates.contains_key(&CurrencyCode::from("GBP")));
    }
}
