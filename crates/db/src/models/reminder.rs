//! Reminder model.

use docket_core::reminders::{ReminderCategory, ReminderPriority, ReminderStatus, ReminderType};
use docket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::populated::DocumentRef;

/// A row from the `reminders` table.
///
/// `document_id` is not serialized directly; responses carry the populated
/// document in its place (see [`crate::models::populated::Populated`]).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    #[serde(rename = "_id")]
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub due_date: Timestamp,
    pub reminder_date: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_start_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_end_date: Option<Timestamp>,
    #[sqlx(try_from = "String")]
    pub priority: ReminderPriority,
    #[sqlx(try_from = "String")]
    pub category: ReminderCategory,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub reminder_type: ReminderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_party1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_party2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_context: Option<String>,
    #[serde(skip)]
    pub document_id: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub status: ReminderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snooze_until: Option<Timestamp>,
    /// Identifier of the mirrored calendar event, once synced.
    #[serde(rename = "googleCalendarEventId", skip_serializing_if = "Option::is_none")]
    pub external_event_ref: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DocumentRef for Reminder {
    fn document_ref(&self) -> Option<&str> {
        self.document_id.as_deref()
    }
}
