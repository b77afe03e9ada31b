//! Calendar event vocabulary, input rules, and list-filter construction.
//!
//! Events keep their date and time-of-day as separate fields. Times must be
//! zero-padded 24-hour `HH:MM` so that ordering by `(date, time)` is
//! chronological.

use std::sync::LazyLock;

use chrono::{NaiveTime, TimeZone};
use regex::Regex;
use serde::Deserialize;

use crate::error::CoreError;
use crate::labels::{define_label_enum, parse_optional};
use crate::object_id;
use crate::reminders::{empty_to_none, filter_value, MSG_DOCUMENT_ID, MSG_TITLE_REQUIRED};
use crate::time::{self, parse_timestamp_in, DateRange, MIN_FILTER_YEAR};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

define_label_enum! {
    /// Kind of calendar event.
    EventType ("type") {
        Meeting = "meeting",
        Deadline = "deadline",
        Court = "court",
        Consultation = "consultation",
        Reminder = "reminder",
    }
}

define_label_enum! {
    /// Event lifecycle status.
    EventStatus ("status") {
        Scheduled = "scheduled",
        Completed = "completed",
        Cancelled = "cancelled",
    }
}

impl Default for EventType {
    fn default() -> Self {
        EventType::Meeting
    }
}

impl Default for EventStatus {
    fn default() -> Self {
        EventStatus::Scheduled
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MSG_DATE: &str = "Valid date is required";
pub const MSG_TIME_REQUIRED: &str = "Time is required";
pub const MSG_TIME_FORMAT: &str = "Time must be in HH:MM 24-hour format";
pub const MSG_FILTER_DATE: &str = "date must be a valid date";
pub const MSG_FILTER_MONTH: &str = "month must be between 1 and 12";
pub const MSG_FILTER_YEAR: &str = "year must be 2000 or later";

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid regex"));

/// Whether `time` is a zero-padded 24-hour `HH:MM` string.
pub fn is_valid_time(time: &str) -> bool {
    TIME_RE.is_match(time)
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Raw event fields as sent by clients, for both create and update.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub document_id: Option<String>,
    pub location: Option<String>,
    pub attendees: Option<Vec<String>>,
    pub status: Option<String>,
}

/// A validated event ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: Timestamp,
    pub time: String,
    pub event_type: EventType,
    pub document_id: Option<DbId>,
    pub location: String,
    pub attendees: Vec<String>,
    pub status: EventStatus,
}

/// A validated partial update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<Timestamp>,
    pub time: Option<String>,
    pub event_type: Option<EventType>,
    pub document_id: Option<DbId>,
    pub location: Option<String>,
    pub attendees: Option<Vec<String>>,
    pub status: Option<EventStatus>,
}

fn check_time(time: &str, errors: &mut Vec<String>) {
    if time.trim().is_empty() {
        errors.push(MSG_TIME_REQUIRED.to_string());
    } else if !is_valid_time(time) {
        errors.push(MSG_TIME_FORMAT.to_string());
    }
}

fn parse_document_id(value: Option<String>, errors: &mut Vec<String>) -> Option<DbId> {
    let value = empty_to_none(value)?;
    match object_id::parse(&value) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(MSG_DOCUMENT_ID.to_string());
            None
        }
    }
}

/// Validate a create payload and apply defaults.
pub fn prepare_new<Tz: TimeZone>(tz: &Tz, p: EventPayload) -> Result<NewEvent, CoreError> {
    let mut errors = Vec::new();

    let title = p.title.filter(|t| !t.trim().is_empty());
    if title.is_none() {
        errors.push(MSG_TITLE_REQUIRED.to_string());
    }

    let date = p.date.as_deref().and_then(|d| parse_timestamp_in(tz, d));
    if date.is_none() {
        errors.push(MSG_DATE.to_string());
    }

    let time = p.time.unwrap_or_default();
    check_time(&time, &mut errors);

    let event_type = parse_optional::<EventType>(p.event_type.as_deref(), &mut errors);
    let status = parse_optional::<EventStatus>(p.status.as_deref(), &mut errors);
    let document_id = parse_document_id(p.document_id, &mut errors);

    match (title, date) {
        (Some(title), Some(date)) if errors.is_empty() => Ok(NewEvent {
            title,
            description: p.description.unwrap_or_default(),
            date,
            time,
            event_type: event_type.unwrap_or_default(),
            document_id,
            location: p.location.unwrap_or_default(),
            attendees: p.attendees.unwrap_or_default(),
            status: status.unwrap_or_default(),
        }),
        _ => Err(CoreError::Validation(errors)),
    }
}

/// Validate an update payload. Only supplied fields are checked.
pub fn prepare_patch<Tz: TimeZone>(tz: &Tz, p: EventPayload) -> Result<EventPatch, CoreError> {
    let mut errors = Vec::new();

    if p.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        errors.push(MSG_TITLE_REQUIRED.to_string());
    }
    let date = match p.date.as_deref() {
        Some(d) => {
            let parsed = parse_timestamp_in(tz, d);
            if parsed.is_none() {
                errors.push(MSG_DATE.to_string());
            }
            parsed
        }
        None => None,
    };
    if let Some(time) = p.time.as_deref() {
        check_time(time, &mut errors);
    }

    let patch = EventPatch {
        date,
        event_type: parse_optional(p.event_type.as_deref(), &mut errors),
        status: parse_optional(p.status.as_deref(), &mut errors),
        document_id: parse_document_id(p.document_id, &mut errors),
        title: p.title,
        description: p.description,
        time: p.time,
        location: p.location,
        attendees: p.attendees,
    };

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(CoreError::Validation(errors))
    }
}

/// Combine an event's date and time-of-day into a single instant.
///
/// The calendar date is read in UTC, matching how bare dates are stored.
/// A malformed time falls back to midnight.
pub fn starts_at(date: Timestamp, time: &str) -> Timestamp {
    let tod = NaiveTime::parse_from_str(time, "%H:%M").unwrap_or(NaiveTime::MIN);
    date.date_naive().and_time(tod).and_utc()
}

// ---------------------------------------------------------------------------
// List filter
// ---------------------------------------------------------------------------

/// Date restriction for listing events, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDateFilter {
    /// One day starting at the given instant.
    Day(Timestamp),
    /// A calendar month in local time.
    Month { year: i32, month: u32 },
    /// A calendar year in local time.
    Year(i32),
}

impl EventDateFilter {
    /// Select the filter mode from raw query values.
    ///
    /// Precedence: exact `date`, then `month` together with `year`, then
    /// `year` alone. A `month` without a `year` is ignored.
    pub fn from_query<Tz: TimeZone>(
        tz: &Tz,
        date: Option<&str>,
        month: Option<&str>,
        year: Option<&str>,
    ) -> Result<Option<Self>, CoreError> {
        let date = date.filter(|v| !v.is_empty());
        let month = month.filter(|v| !v.is_empty());
        let year = year.filter(|v| !v.is_empty());

        if let Some(date) = date {
            let day = parse_timestamp_in(tz, date).ok_or_else(|| CoreError::invalid(MSG_FILTER_DATE))?;
            return Ok(Some(EventDateFilter::Day(day)));
        }

        let Some(year) = year else {
            return Ok(None);
        };
        let year = parse_year(year)?;

        match month {
            Some(month) => Ok(Some(EventDateFilter::Month {
                year,
                month: parse_month(month)?,
            })),
            None => Ok(Some(EventDateFilter::Year(year))),
        }
    }

    /// The half-open instant range this filter selects.
    pub fn range<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateRange, CoreError> {
        let range = match *self {
            EventDateFilter::Day(start) => Some(time::day_window(start)),
            EventDateFilter::Month { year, month } => time::month_window(tz, year, month),
            EventDateFilter::Year(year) => time::year_window(tz, year),
        };
        range.ok_or_else(|| CoreError::invalid(MSG_FILTER_YEAR))
    }
}

fn parse_month(value: &str) -> Result<u32, CoreError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| CoreError::invalid(MSG_FILTER_MONTH))
}

fn parse_year(value: &str) -> Result<i32, CoreError> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|y| *y >= MIN_FILTER_YEAR)
        .ok_or_else(|| CoreError::invalid(MSG_FILTER_YEAR))
}

/// Complete event list filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub range: Option<DateRange>,
    pub event_type: Option<EventType>,
    pub status: Option<EventStatus>,
}

impl EventFilter {
    /// Build a filter from raw query values, resolving date windows in `tz`.
    pub fn parse<Tz: TimeZone>(
        tz: &Tz,
        date: Option<&str>,
        month: Option<&str>,
        year: Option<&str>,
        event_type: Option<&str>,
        status: Option<&str>,
    ) -> Result<Self, CoreError> {
        let range = match EventDateFilter::from_query(tz, date, month, year)? {
            Some(mode) => Some(mode.range(tz)?),
            None => None,
        };

        let mut errors = Vec::new();
        let filter = EventFilter {
            range,
            event_type: parse_optional(filter_value(event_type), &mut errors),
            status: parse_optional(filter_value(status), &mut errors),
        };
        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(CoreError::Validation(errors))
        }
    }
}
