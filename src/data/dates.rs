//! Flexible calendar-date parsing for user-typed input.
//!
//! Users type dates by hand, so we accept the common spellings rather than a
//! single format. The first format that matches wins; time-of-day parts are
//! accepted and discarded.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Input that could not be read as a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a recognized date")]
pub struct InvalidDate {
    pub input: String,
}

/// Full-date formats, tried in order.
///
/// Month names use `%B`, which chrono also matches against abbreviations.
/// The two-digit year variant must precede the four-digit one: `%Y` would
/// happily read `16` as year 16.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%d-%B-%Y",
    "%A, %B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse `raw` (trimmed) into a calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, InvalidDate> {
    let s = raw.trim();
    let invalid = || InvalidDate {
        input: s.to_string(),
    };
    if s.is_empty() {
        return Err(invalid());
    }

    parse_all_digits(s)
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .find(|date| four_digit_year(*date))
        })
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
                .find(|date| four_digit_year(*date))
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| parse_month_only(s))
        .ok_or_else(invalid)
}

/// Digit runs are read greedily, so `Nov 2016` can match `%B %d %Y` as day 20
/// of year 16. Requiring a four-digit year rejects those splits.
fn four_digit_year(date: NaiveDate) -> bool {
    (1000..=9999).contains(&date.year())
}

/// `YYYY` (January 1) and compact `YYYYMMDD`.
fn parse_all_digits(s: &str) -> Option<NaiveDate> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = match s.len() {
        4 => NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1),
        8 => NaiveDate::from_ymd_opt(s[..4].parse().ok()?, s[4..6].parse().ok()?, s[6..].parse().ok()?),
        _ => None,
    };
    date.filter(|d| four_digit_year(*d))
}

/// Year-month spellings (`2016-11`, `2016/11`, `Nov 2016`), resolved to the
/// first day of the month.
fn parse_month_only(s: &str) -> Option<NaiveDate> {
    let candidates = [
        (format!("{s}-1"), "%Y-%m-%d", s.matches('-').count() == 1),
        (format!("{s}/1"), "%Y/%m/%d", s.matches('/').count() == 1),
        (format!("{s} 1"), "%B %Y %d", true),
    ];
    candidates
        .into_iter()
        .filter(|(_, _, applies)| *applies)
        .filter_map(|(padded, fmt, _)| NaiveDate::parse_from_str(&padded, fmt).ok())
        .find(|date| four_digit_year(*date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn iso_dates_with_and_without_padding() {
        assert_eq!(parse_date("1951-11-01").unwrap(), d(1951, 11, 1));
        assert_eq!(parse_date("2016-11-1").unwrap(), d(2016, 11, 1));
        assert_eq!(parse_date("  2016-11-01 \n").unwrap(), d(2016, 11, 1));
        assert_eq!(parse_date("2016/11/01").unwrap(), d(2016, 11, 1));
        assert_eq!(parse_date("2016.11.01").unwrap(), d(2016, 11, 1));
    }

    #[test]
    fn us_and_named_month_formats() {
        assert_eq!(parse_date("11/1/2016").unwrap(), d(2016, 11, 1));
        assert_eq!(parse_date("11/01/16").unwrap(), d(2016, 11, 1));
        assert_eq!(parse_date("11-01-2016").unwrap(), d(2016, 11, 1));
        assert_eq!(parse_date("Nov 1 2016").unwrap(), d(2016, 11, 1));
        assert_eq!(parse_date("November 1, 2016").unwrap(), d(2016, 11, 1));
        assert_eq!(parse_date("1 Nov 2016").unwrap(), d(2016, 11, 1));
        assert_eq!(parse_date("01-Nov-2016").unwrap(), d(2016, 11, 1));
    }

    #[test]
    fn partial_and_compact_dates() {
        assert_eq!(parse_date("2016").unwrap(), d(2016, 1, 1));
        assert_eq!(parse_date("20161101").unwrap(), d(2016, 11, 1));
        assert_eq!(parse_date("2016-11").unwrap(), d(2016, 11, 1));
        assert_eq!(parse_date("Nov 2016").unwrap(), d(2016, 11, 1));
    }

    #[test]
    fn datetimes_keep_the_date_part() {
        assert_eq!(parse_date("2016-11-01T12:30:00").unwrap(), d(2016, 11, 1));
        assert_eq!(parse_date("2016-11-01 23:59").unwrap(), d(2016, 11, 1));
        assert_eq!(parse_date("2016-11-01T00:00:00Z").unwrap(), d(2016, 11, 1));
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        let rejected = [
            "",
            "   ",
            "not-a-date",
            "2016-13-01",
            "2016-02-30",
            "20161301",
            "yesterday",
            "12345",
            "0000",
            "00000101",
            "0999",
        ];
        for raw in rejected {
            let err = parse_date(raw).unwrap_err();
            assert_eq!(err.input, raw.trim(), "input {raw:?} should be rejected");
        }
    }
}
