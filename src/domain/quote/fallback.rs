//! Fixed quote shown whenever a live fetch fails.

use super::Quote;
use crate::shared::{CurrencyCode, Metal};

const FALLBACK_METALS: [(Metal, f64); 3] = [
    (Metal::Gold, 2025.50),
    (Metal::Silver, 25.75),
    (Metal::Platinum, 1015.30),
];

const FALLBACK_CURRENCIES: [(&str, f64); 6] = [
    ("USD", 1.0),
    ("INR", 0.011407),
    ("EUR", 1.0870),
    ("GBP", 1.2650),
    ("JPY", 0.006734),
    ("CAD", 0.7345),
];

/// The degraded-mode quote. Shaped exactly like a live one.
pub fn fallback_quote() -> Quote {
    Quote::new(
        FALLBACK_METALS.into_iter().collect(),
        FALLBACK_CURRENCIES
            .into_iter()
            .map(|(code, rate)| (CurrencyCode::from(code), rate))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_quote_contents() {
        let quote = fallback_quote();
        assert_eq!(quote.metals.len(), 3);
        assert_eq!(quote.price(Metal::Silver), Some(25.75));
        assert_eq!(quote.rate(&CurrencyCode::usd()), Some(1.0));
        assert_eq!(quote.currency_codes().len(), 6);
    }
}
