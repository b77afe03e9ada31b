//! Query parameter types for list endpoints.
//!
//! Values are kept as raw strings and parsed by the `docket_core` filter
//! builders, so a bad enum label yields a validation message rather than a
//! deserialization rejection.

use serde::Deserialize;

/// `GET /api/reminders?status=&type=&priority=`
#[derive(Debug, Default, Deserialize)]
pub struct ReminderListParams {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub reminder_type: Option<String>,
    pub priority: Option<String>,
}

/// `GET /api/events?date=&month=&year=&type=&status=`
#[derive(Debug, Default, Deserialize)]
pub struct EventListParams {
    pub date: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub status: Option<String>,
}

/// `GET /api/documents?category=&tag=&search=`
#[derive(Debug, Default, Deserialize)]
pub struct DocumentListParams {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}
