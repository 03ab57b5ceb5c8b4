//! Best-effort calendar date parsing.
//!
//! Unreadable values yield `None`; callers decide how a missing date
//! affects each view.

use chrono::{NaiveDate, NaiveDateTime};

use crate::parser::workbook::excel_serial_to_datetime;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

/// Serial numbers below this are more likely years or amounts than dates.
const MIN_EXCEL_SERIAL: f64 = 10_000.0;

/// Parse a date in any of the supported layouts.
///
/// Accepted: ISO dates and datetimes, US `m/d/Y` and `m/d/y`, `Y/m/d`,
/// `d-b-Y`, month names, a bare four-digit year (taken as January 1st) and
/// Excel serial numbers. Time components are dropped.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(date) = parse_slashed(value) {
        return Some(date);
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    parse_numeric(value)
}

/// `m/d/yy` and `m/d/yyyy`, optionally followed by a time.
///
/// The year width picks the format so `1/5/23` is 2023 rather than year 23.
fn parse_slashed(value: &str) -> Option<NaiveDate> {
    let date_part = value.split_whitespace().next()?;
    let parts: Vec<&str> = date_part.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    if parts[0].len() == 4 {
        return NaiveDate::parse_from_str(date_part, "%Y/%m/%d").ok();
    }
    let format = if parts[2].len() <= 2 { "%m/%d/%y" } else { "%m/%d/%Y" };
    NaiveDate::parse_from_str(date_part, format).ok()
}

fn parse_numeric(value: &str) -> Option<NaiveDate> {
    let number: f64 = value.parse().ok()?;
    if !number.is_finite() {
        return None;
    }
    if number.fract() == 0.0 && (1900.0..=2100.0).contains(&number) && !value.contains('.') {
        return NaiveDate::from_ymd_opt(number as i32, 1, 1);
    }
    if number >= MIN_EXCEL_SERIAL {
        return excel_serial_to_datetime(number).map(|dt| dt.date());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_iso_formats() {
        assert_eq!(parse_date("2023-04-05"), ymd(2023, 4, 5));
        assert_eq!(parse_date("2023-04-05 13:45:00"), ymd(2023, 4, 5));
        assert_eq!(parse_date("2023-04-05T13:45:00.250"), ymd(2023, 4, 5));
        assert_eq!(parse_date(" 2023/04/05 "), ymd(2023, 4, 5));
    }

    #[test]
    fn test_us_formats() {
        assert_eq!(parse_date("4/5/2023"), ymd(2023, 4, 5));
        assert_eq!(parse_date("04/05/23"), ymd(2023, 4, 5));
        assert_eq!(parse_date("4/5/2023 9:30"), ymd(2023, 4, 5));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(parse_date("05-Apr-2023"), ymd(2023, 4, 5));
        assert_eq!(parse_date("April 5, 2023"), ymd(2023, 4, 5));
    }

    #[test]
    fn test_numeric_values() {
        assert_eq!(parse_date("44927"), ymd(2023, 1, 1));
        assert_eq!(parse_date("2021"), ymd(2021, 1, 1));
        assert_eq!(parse_date("250"), None);
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("Yes"), None);
        assert_eq!(parse_date("13/45/2023"), None);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_huge_numbers_are_none() {
        assert_eq!(parse_date("1e20"), None);
        assert_eq!(parse_date("99999999999999"), None);
        assert_eq!(parse_date("2958466"), None);
    }
}
