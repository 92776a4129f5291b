//! Custom serde helpers for the metals API wire formats.

use chrono::NaiveDate;

/// Wire format for calendar dates in requests (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a calendar date, accepting non-padded (`2024-1-9`) and
/// timestamp-suffixed (`2024-01-09T00:00:00Z`) forms.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().split(['T', ' ']).next()?;
    let mut parts = day.splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let dom = parts.next()?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, dom)
}

/// Deserializes an optional calendar date with [`parse_calendar_date`].
///
/// Unparseable strings become `None` instead of failing the whole payload.
pub mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_calendar_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_padded_and_unpadded() {
        assert_eq!(parse_calendar_date("2024-01-20"), Some(ymd(2024, 1, 20)));
        assert_eq!(parse_calendar_date("2024-1-9"), Some(ymd(2024, 1, 9)));
        assert_eq!(parse_calendar_date(" 2024-12-31T00:00:00Z"), Some(ymd(2024, 12, 31)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("2024-02-30"), None);
        assert_eq!(parse_calendar_date("yesterday"), None);
    }

    #[test]
    fn test_lenient_date_field() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, with = "lenient_date")]
            date: Option<NaiveDate>,
        }

        let row: Row = serde_json::from_str(r#"{"date":"2024-1-5"}"#).unwrap();
        assert_eq!(row.date, Some(ymd(2024, 1, 5)));
        let row: Row = serde_json::from_str(r#"{"date":"soon"}"#).unwrap();
        assert_eq!(row.date, None);
        let row: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(row.date, None);
    }
}
