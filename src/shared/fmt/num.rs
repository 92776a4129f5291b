//! Number formatting utilities for human-readable display.
//!
//! Prices at or above 1,000 are shown as whole numbers with `,` separators;
//! smaller prices always carry exactly two decimal places.

/// Threshold at or above which prices drop their fractional digits.
pub const WHOLE_NUMBER_THRESHOLD: f64 = 1000.0;

/// Adds thousands separators to the integer part of a formatted number.
///
/// Fractional digits are kept as-is (no trimming).
pub fn group_thousands(formatted: &str) -> String {
    let (integer, fraction) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted, None),
    };

    let grouped = integer
        .chars()
        .rev()
        .collect::<String>()
        .as_bytes()
        .chunks(3)
        .map(|c| std::str::from_utf8(c).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",")
        .chars()
        .rev()
        .collect::<String>();

    let grouped = grouped
        .strip_prefix("-,")
        .map(|rest| format!("-{}", rest))
        .unwrap_or(grouped);

    match fraction {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

/// Format a display price. Exact ties round away from zero.
pub fn format_price(value: f64) -> String {
    if value.abs() >= WHOLE_NUMBER_THRESHOLD {
        group_thousands(&format!("{:.0}", value.round()))
    } else {
        format!("{:.2}", round_tie_away(value, 100.0))
    }
}

/// `{:.N}` rounds exact ties to even. Resolve those ties away from zero
/// first; any other value is already rounded correctly by the formatter.
fn round_tie_away(value: f64, scale: f64) -> f64 {
    let scaled = value * scale;
    let product_is_exact = value.mul_add(scale, -scaled) == 0.0;
    if product_is_exact && (scaled - scaled.trunc()).abs() == 0.5 {
        scaled.round() / scale
    } else {
        value
    }
}

/// Format an exchange rate with four decimal places (e.g. `87.6655`).
pub fn format_rate(rate: f64) -> String {
    group_thousands(&format!("{:.4}", rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands_integers() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567890"), "1,234,567,890");
    }

    #[test]
    fn test_group_thousands_keeps_fraction() {
        assert_eq!(group_thousands("1234.50"), "1,234.50");
        assert_eq!(group_thousands("1.00"), "1.00");
    }

    #[test]
    fn test_group_thousands_negative() {
        assert_eq!(group_thousands("-1"), "-1");
        assert_eq!(group_thousands("-100"), "-100");
        assert_eq!(group_thousands("-1000"), "-1,000");
        assert_eq!(group_thousands("-123456.78"), "-123,456.78");
    }

    #[test]
    fn test_format_price_below_threshold_two_decimals() {
        assert_eq!(format_price(0.0), "0.00");
        assert_eq!(format_price(0.7616), "0.76");
        assert_eq!(format_price(12.5), "12.50");
        assert_eq!(format_price(999.5), "999.50");
    }

    #[test]
    fn test_format_price_ties_round_away_from_zero() {
        assert_eq!(format_price(2024.5), "2,025");
        assert_eq!(format_price(1000.5), "1,001");
        assert_eq!(format_price(0.125), "0.13");
        assert_eq!(format_price(12.375), "12.38");
        assert_eq!(format_price(-0.125), "-0.13");
    }

    #[test]
    fn test_format_price_near_ties_follow_exact_value() {
        // Both are stored just below the tie.
        assert_eq!(format_price(2.675), "2.67");
        assert_eq!(format_price(1.005), "1.00");
    }

    #[test]
    fn test_format_price_at_or_above_threshold_whole_grouped() {
        assert_eq!(format_price(1000.0), "1,000");
        assert_eq!(format_price(2025.5), "2,026");
        assert_eq!(format_price(5708.888), "5,709");
        assert_eq!(format_price(1234567.4), "1,234,567");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(1.0), "1.0000");
        assert_eq!(format_rate(87.66547), "87.6655");
        assert_eq!(format_rate(148.4998), "148.4998");
    }
}
