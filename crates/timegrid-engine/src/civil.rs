//! Civil-date helpers -- date-only arithmetic with no timezone component.
//!
//! Inputs to the engines are already-resolved local wall-clock values, so
//! everything here works on `chrono`'s naive types: a "civil date" is a
//! `NaiveDate`, the canonical key format is zero-padded `YYYY-MM-DD`, and
//! month arithmetic clamps to month length (day 31 stepped into February
//! becomes Feb 28 or 29) instead of skipping.

use crate::error::{GridError, Result};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

/// Parse a canonical `YYYY-MM-DD` date key into a civil date.
///
/// Components are taken literally -- no timezone shifting. This is the only
/// fallible operation in the crate; callers are expected to pre-validate the
/// string shape.
///
/// # Errors
/// Returns [`GridError::InvalidDateKey`] if the string is not a valid date.
///
/// # Examples
///
/// ```
/// use timegrid_engine::civil::{date_key, parse_date_key};
///
/// let date = parse_date_key("2026-03-09").unwrap();
/// assert_eq!(date_key(date), "2026-03-09");
/// assert!(parse_date_key("2026-02-30").is_err());
/// ```
pub fn parse_date_key(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| GridError::InvalidDateKey(s.to_string()))
}

/// Format a civil date as its canonical zero-padded `YYYY-MM-DD` key.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Strip the time-of-day from a wall-clock timestamp.
///
/// The result is a date-only value comparable by equality, used for span
/// membership checks ("does this event touch day X").
pub fn start_of_day(ts: NaiveDateTime) -> NaiveDate {
    ts.date()
}

/// Number of days in the given month, leap-year aware.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    debug_assert!((1..=12).contains(&month), "month out of range: {}", month);
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    // Last day of a month is the day before the first of the next month.
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

/// The date in `month`'s month whose day-of-month is `day`, clamped to the
/// month's length.
///
/// `month` may be any date within the target month. Day 31 against February
/// yields Feb 28 (or 29 in a leap year); day 0 is treated as day 1.
pub fn clamp_day(month: NaiveDate, day: u32) -> NaiveDate {
    let last = days_in_month(month.year(), month.month());
    month.with_day(day.clamp(1, last)).unwrap_or(month)
}

/// Step a civil date forward by whole calendar months, clamping the day to
/// the target month's length.
///
/// Saturates at the end of chrono's representable range instead of failing,
/// so the instance caps remain the bounding mechanism for far-future anchors.
pub fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Weekday number with the grid's convention: 0 = Sunday .. 6 = Saturday.
pub fn weekday_number(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}
