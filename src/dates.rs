//! Strict full-date parsing.
//!
//! [`parse_date`] accepts dates with low precision but rejects strings that
//! only pin down a time or a partial date. The trick is to parse the string
//! twice against two deliberately distant default fill-in dates: if the two
//! results disagree, the string relied on the default for some calendar field
//! and is rejected. `"June 2020"` parses to `2020-06-01 00:00:00 UTC`, while
//! `"June 6 11:00"` is rejected (could be any year). When no timezone is
//! present the result is assumed UTC; every parse failure, overflow, or
//! unknown-timezone condition uniformly yields `None`.

use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use regex::Regex;

/// Two distant defaults; a string that under-specifies the date resolves
/// differently against each and is rejected.
const DEFAULTS: [(i32, u32, u32); 2] = [(1985, 1, 1), (2005, 6, 1)];

static RE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\b").expect("year pattern"));
static RE_YEAR_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-?(0[1-9]|1[0-2])").expect("year-month pattern"));
static RE_EIGHT_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}$").expect("compact date pattern"));
static RE_FOUR_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("bare year pattern"));

const DATETIME_TZ_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%B %d %Y %H:%M:%S",
    "%B %d %Y %H:%M",
    "%b %d %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

// Day is filled from the default date.
const YEAR_MONTH_FORMATS: &[&str] = &["%Y-%m %d", "%B %Y %d", "%b %Y %d", "%B, %Y %d"];

// Year is filled from the default date.
const MONTH_DAY_FORMATS: &[&str] = &[
    "%B %d %H:%M:%S %Y",
    "%b %d %H:%M:%S %Y",
    "%B %d %H:%M %Y",
    "%b %d %H:%M %Y",
    "%B %d %Y",
    "%b %d %Y",
];

// Whole date is filled from the default.
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Extracts the first standalone 4-digit year from a string.
pub fn extract_year(value: &str) -> Option<&str> {
    RE_YEAR.find(value).map(|m| m.as_str())
}

/// Extracts a `YYYY-MM` / `YYYYMM` year-month prefix from a string.
pub fn extract_year_month(value: &str) -> Option<&str> {
    RE_YEAR_MONTH.find(value).map(|m| m.as_str())
}

fn parse_with_default(value: &str, default: NaiveDate) -> Option<DateTime<Utc>> {
    for fmt in DATETIME_TZ_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, fmt) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(Utc.from_utc_datetime(&parsed));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return at_midnight(parsed);
        }
    }
    // Compact YYYYMMDD; digits only, otherwise "20200106" never reaches the
    // date formats above
    if RE_EIGHT_DIGITS.is_match(value) {
        let year: i32 = value[..4].parse().ok()?;
        let month: u32 = value[4..6].parse().ok()?;
        let day: u32 = value[6..8].parse().ok()?;
        return at_midnight(NaiveDate::from_ymd_opt(year, month, day)?);
    }
    // Year and month only: the day comes from the default (both defaults use
    // day 1, so these still agree across the two passes)
    for fmt in YEAR_MONTH_FORMATS {
        let padded = format!("{value} {:02}", default.day());
        if let Ok(parsed) = NaiveDate::parse_from_str(&padded, fmt) {
            return at_midnight(parsed);
        }
    }
    // Bare year: month and day come from the default, so the two passes
    // disagree and the string is rejected
    if RE_FOUR_DIGITS.is_match(value) {
        let year: i32 = value.parse().ok()?;
        return at_midnight(NaiveDate::from_ymd_opt(
            year,
            default.month(),
            default.day(),
        )?);
    }
    // Month and day without a year: the year comes from the default
    for fmt in MONTH_DAY_FORMATS {
        let padded = format!("{value} {}", default.year());
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&padded, fmt) {
            return Some(Utc.from_utc_datetime(&parsed));
        }
        if let Ok(parsed) = NaiveDate::parse_from_str(&padded, fmt) {
            return at_midnight(parsed);
        }
    }
    // Time of day only: the whole date comes from the default
    for fmt in TIME_FORMATS {
        if let Ok(parsed) = NaiveTime::parse_from_str(value, fmt) {
            return Some(Utc.from_utc_datetime(&default.and_time(parsed)));
        }
    }
    None
}

fn at_midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// Parses a full calendar instant from a string, or `None` when the string
/// does not pin one down.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut passes = DEFAULTS.iter().map(|&(year, month, day)| {
        let default = NaiveDate::from_ymd_opt(year, month, day)?;
        parse_with_default(trimmed, default)
    });
    let first = passes.next()??;
    let second = passes.next()??;
    if first != second {
        // The default leaked into the result; this was not a full date
        return None;
    }
    Some(first)
}

/// Parses every value in a column, keeping only the full dates.
pub fn parse_dates<S: AsRef<str>>(values: &[S]) -> Vec<DateTime<Utc>> {
    values
        .iter()
        .filter_map(|value| parse_date(value.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn month_and_year_parse_to_first_of_month() {
        assert_eq!(parse_date("June 2020"), Some(utc(2020, 6, 1, 0, 0, 0)));
        assert_eq!(parse_date("Jun 2020"), Some(utc(2020, 6, 1, 0, 0, 0)));
        assert_eq!(parse_date("2020-06"), Some(utc(2020, 6, 1, 0, 0, 0)));
    }

    #[test]
    fn month_day_time_without_year_is_rejected() {
        assert_eq!(parse_date("June 6 11:00"), None);
        assert_eq!(parse_date("June 6"), None);
    }

    #[test]
    fn time_only_strings_are_rejected() {
        assert_eq!(parse_date("11:00"), None);
        assert_eq!(parse_date("23:59:59"), None);
    }

    #[test]
    fn bare_years_are_rejected() {
        assert_eq!(parse_date("2020"), None);
        assert_eq!(parse_date("1985"), None);
    }

    #[test]
    fn full_dates_parse_at_midnight_utc() {
        assert_eq!(parse_date("2020-01-02"), Some(utc(2020, 1, 2, 0, 0, 0)));
        assert_eq!(parse_date("June 6, 2020"), Some(utc(2020, 6, 6, 0, 0, 0)));
        assert_eq!(parse_date("20200106"), Some(utc(2020, 1, 6, 0, 0, 0)));
    }

    #[test]
    fn datetimes_normalize_to_utc() {
        assert_eq!(
            parse_date("2020-01-02T03:04:05"),
            Some(utc(2020, 1, 2, 3, 4, 5))
        );
        assert_eq!(
            parse_date("2020-01-02T03:04:05+02:00"),
            Some(utc(2020, 1, 2, 1, 4, 5))
        );
    }

    #[test]
    fn garbage_and_overflow_are_rejected() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("99999999"), None);
        assert_eq!(parse_date("20201345"), None);
    }

    #[test]
    fn year_extraction_requires_standalone_digits() {
        assert_eq!(extract_year("2020-06"), Some("2020"));
        assert_eq!(extract_year("in 1999 or so"), Some("1999"));
        assert_eq!(extract_year("12345"), None);
        assert_eq!(extract_year_month("202006"), Some("202006"));
        assert_eq!(extract_year_month("2020-06"), Some("2020-06"));
    }
}
