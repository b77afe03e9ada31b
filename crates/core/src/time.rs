//! Date parsing and calendar windows.
//!
//! Inbound dates are ISO-8601 strings. A bare date (`2024-06-01`) is taken
//! as UTC midnight; a date-time without an offset is taken in the supplied
//! time zone; a date-time with an offset is exact.
//!
//! All windows are half-open: `start <= t < end`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::types::Timestamp;

/// Accepted layouts for date-times that carry no offset.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Earliest year accepted by the month/year event filters.
pub const MIN_FILTER_YEAR: i32 = 2000;

/// A half-open instant range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DateRange {
    /// Whether `t` falls inside the range (upper bound exclusive).
    pub fn contains(&self, t: Timestamp) -> bool {
        self.start <= t && t < self.end
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an ISO-8601 date or date-time, resolving offset-less values in `tz`.
pub fn parse_timestamp_in<Tz: TimeZone>(tz: &Tz, value: &str) -> Option<Timestamp> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(resolve_local(tz, naive));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Map a wall-clock time in `tz` to UTC.
///
/// Ambiguous times take the earlier instant. Times skipped by a DST
/// transition fall back to reading the wall-clock value as UTC.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Timestamp {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

/// The instant of midnight at the start of `date` in `tz`.
pub fn day_start<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Timestamp {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// The "today" window for `now`: local midnight truncated, plus 24 hours.
pub fn today_window<Tz: TimeZone>(now: &DateTime<Tz>) -> DateRange {
    let start = day_start(&now.timezone(), now.date_naive());
    DateRange {
        start,
        end: start + Duration::hours(24),
    }
}

/// One day starting at `start`.
pub fn day_window(start: Timestamp) -> DateRange {
    DateRange {
        start,
        end: start + Duration::days(1),
    }
}

/// The calendar month `month` (1-12) of `year` in `tz`.
///
/// Returns `None` when the month is out of range.
pub fn month_window<Tz: TimeZone>(tz: &Tz, year: i32, month: u32) -> Option<DateRange> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(DateRange {
        start: day_start(tz, first),
        end: day_start(tz, next),
    })
}

/// The calendar year `year` in `tz`.
pub fn year_window<Tz: TimeZone>(tz: &Tz, year: i32) -> Option<DateRange> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let next = NaiveDate::from_ymd_opt(year + 1, 1, 1)?;
    Some(DateRange {
        start: day_start(tz, first),
        end: day_start(tz, next),
    })
}
