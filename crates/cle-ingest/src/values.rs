//! Cell-level parsing for identifiers, counts and dates.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%y", "%d-%b-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a calendar date, truncating any time of day to midnight.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|datetime| datetime.date())
        })
}

/// Parse an integer cell. Spreadsheet exports often render integers as
/// `12.0`; those are accepted, `12.5` is not.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(parsed);
    }
    let float = trimmed.parse::<f64>().ok()?;
    if float.is_finite() && float.fract() == 0.0 && float.abs() < 9.0e15 {
        Some(float as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_supported_date_shapes() {
        assert_eq!(parse_date("2024-01-05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024/01/05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("01/05/2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("05-Jan-24"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T13:45:00"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 23:59"), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn rejects_non_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date("2024-13-40"), None);
    }

    #[test]
    fn parses_integers() {
        assert_eq!(parse_i64("42"), Some(42));
        assert_eq!(parse_i64(" 42.0 "), Some(42));
        assert_eq!(parse_i64("42.5"), None);
        assert_eq!(parse_i64("MRN42"), None);
    }
}
