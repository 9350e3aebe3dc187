//! Release date parsing.
//!
//! Sources publish dates as `YYYY-MM-DD` (sometimes with a trailing time)
//! or compact `YYYYMMDD`. A date only counts as valid if its year falls in
//! `2000..=current year + 2`; anything else is treated as missing.

use chrono::{Datelike, NaiveDate, Utc};

const MIN_YEAR: i32 = 2000;
const FUTURE_YEARS: i32 = 2;

/// Parse a release date string without range validation.
pub fn parse_date_lenient(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    let bytes = s.as_bytes();

    // ISO: YYYY-MM-DD followed by end, 'T' or whitespace
    if bytes.len() >= 10 && bytes[4] == b'-' && bytes[7] == b'-' {
        let (day, rest) = (s.get(..10)?, s.get(10..)?);
        if rest.is_empty() || rest.starts_with('T') || rest.starts_with(char::is_whitespace) {
            return NaiveDate::parse_from_str(day, "%Y-%m-%d").ok();
        }
        return None;
    }

    // Compact: YYYYMMDD prefix
    if bytes.len() >= 8 && bytes[..8].iter().all(u8::is_ascii_digit) {
        return NaiveDate::parse_from_str(&s[..8], "%Y%m%d").ok();
    }

    None
}

/// Parse a release date, rejecting dates outside the plausible range.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let date = parse_date_lenient(raw)?;
    let max_year = Utc::now().year() + FUTURE_YEARS;
    (MIN_YEAR..=max_year).contains(&date.year()).then_some(date)
}

/// Whether `raw` holds a valid release date.
pub fn is_valid_release_date(raw: Option<&str>) -> bool {
    raw.and_then(parse_release_date).is_some()
}

/// Unix timestamp (UTC midnight) of a valid release date.
pub fn release_timestamp(raw: Option<&str>) -> Option<i64> {
    let date = raw.and_then(parse_release_date)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}

/// Long-form display, e.g. `May 1, 2023`, or `Unknown`.
pub fn format_date(raw: Option<&str>) -> String {
    match raw.and_then(parse_date_lenient) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso() {
        let d = parse_release_date("2023-05-01").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2023, 5, 1));
        assert!(parse_release_date("2023-05-01T12:00:00Z").is_some());
        assert!(parse_release_date("2023-05-01 08:00").is_some());
    }

    #[test]
    fn test_parse_compact() {
        let d = parse_release_date("20200101").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2020, 1, 1));
    }

    #[test]
    fn test_rejects_out_of_range_years() {
        assert!(parse_release_date("1999-12-31").is_none());
        assert!(parse_release_date("2999-01-01").is_none());
        assert!(parse_date_lenient("1999-12-31").is_some());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_release_date("").is_none());
        assert!(parse_release_date("TBA").is_none());
        assert!(parse_release_date("2023-13-01").is_none());
        assert!(parse_release_date("2023-05-01x").is_none());
    }

    #[test]
    fn test_timestamp_ordering() {
        let a = release_timestamp(Some("2020-01-01")).unwrap();
        let b = release_timestamp(Some("2021-01-01")).unwrap();
        assert!(a < b);
        assert_eq!(release_timestamp(None), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2023-05-01")), "May 1, 2023");
        assert_eq!(format_date(None), "Unknown");
        assert_eq!(format_date(Some("soon")), "Unknown");
    }
}
