//! Calendar event model.

use docket_core::events::{EventStatus, EventType};
use docket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::populated::DocumentRef;

/// A row from the `events` table.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: DbId,
    pub title: String,
    pub description: String,
    #[serde(rename = "date")]
    pub event_date: Timestamp,
    /// Zero-padded `HH:MM`.
    #[serde(rename = "time")]
    pub event_time: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub event_type: EventType,
    #[serde(skip)]
    pub document_id: Option<DbId>,
    pub location: String,
    pub attendees: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: EventStatus,
    #[serde(rename = "googleCalendarEventId", skip_serializing_if = "Option::is_none")]
    pub external_event_ref: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DocumentRef for Event {
    fn document_ref(&self) -> Option<&str> {
        self.document_id.as_deref()
    }
}
