//! Reminder vocabulary and input rules.
//!
//! Inbound payloads arrive as loosely-typed JSON ([`ReminderPayload`]). The
//! `prepare_*` functions normalise them, validate every field (collecting all
//! failures rather than stopping at the first), apply defaults, and return
//! typed values ready for persistence.
//!
//! The status field is deliberately permissive: any status may follow any
//! other through a generic update, and dismiss/snooze carry no guard.

use chrono::TimeZone;
use serde::Deserialize;

use crate::error::CoreError;
use crate::labels::{define_label_enum, parse_optional};
use crate::object_id;
use crate::time::parse_timestamp_in;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

define_label_enum! {
    /// How pressing a reminder is.
    ReminderPriority ("priority") {
        Low = "low",
        Medium = "medium",
        High = "high",
        Urgent = "urgent",
    }
}

define_label_enum! {
    /// Practice area a reminder belongs to. Always required.
    ReminderCategory ("category") {
        Legal = "legal",
        Administrative = "administrative",
        Client = "client",
        Court = "court",
        Deadline = "deadline",
        Meeting = "meeting",
    }
}

define_label_enum! {
    /// Origin or nature of a reminder.
    ReminderType ("type") {
        Manual = "manual",
        Deadline = "deadline",
        Court = "court",
        Filing = "filing",
        Meeting = "meeting",
    }
}

define_label_enum! {
    /// Lifecycle status. See the module docs for transition rules.
    ReminderStatus ("status") {
        Active = "active",
        Dismissed = "dismissed",
        Completed = "completed",
        Snoozed = "snoozed",
    }
}

impl Default for ReminderPriority {
    fn default() -> Self {
        ReminderPriority::Medium
    }
}

impl Default for ReminderType {
    fn default() -> Self {
        ReminderType::Manual
    }
}

impl Default for ReminderStatus {
    fn default() -> Self {
        ReminderStatus::Active
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const MSG_TITLE_REQUIRED: &str = "Title is required";
pub const MSG_DUE_DATE: &str = "Valid due date is required";
pub const MSG_REMINDER_DATE: &str = "Valid reminder date is required";
pub const MSG_TERM_START_DATE: &str = "Term start date must be a valid date";
pub const MSG_TERM_END_DATE: &str = "Term end date must be a valid date";
pub const MSG_CATEGORY_REQUIRED: &str = "Category is required";
pub const MSG_DOCUMENT_ID: &str = "Invalid document ID";
pub const MSG_SNOOZE_DATE: &str = "Valid snooze date is required";

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Raw reminder fields as sent by clients, for both create and update.
///
/// Dates are kept as strings so that malformed values produce a validation
/// message instead of a deserialization failure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub reminder_date: Option<String>,
    pub term_start_date: Option<String>,
    pub term_end_date: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub reminder_type: Option<String>,
    pub assigned_to: Option<String>,
    pub related_case: Option<String>,
    pub contract_party1: Option<String>,
    pub contract_party2: Option<String>,
    pub extracted_context: Option<String>,
    pub document_id: Option<String>,
    pub status: Option<String>,
}

/// Body of a snooze request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnoozePayload {
    pub snooze_until: Option<String>,
}

/// A validated reminder ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReminder {
    pub title: String,
    pub description: String,
    pub due_date: Timestamp,
    pub reminder_date: Timestamp,
    pub term_start_date: Option<Timestamp>,
    pub term_end_date: Option<Timestamp>,
    pub priority: ReminderPriority,
    pub category: ReminderCategory,
    pub reminder_type: ReminderType,
    pub assigned_to: Option<String>,
    pub related_case: Option<String>,
    pub contract_party1: Option<String>,
    pub contract_party2: Option<String>,
    pub extracted_context: Option<String>,
    pub document_id: Option<DbId>,
    pub status: ReminderStatus,
}

/// A validated partial update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Timestamp>,
    pub reminder_date: Option<Timestamp>,
    pub term_start_date: Option<Timestamp>,
    pub term_end_date: Option<Timestamp>,
    pub priority: Option<ReminderPriority>,
    pub category: Option<ReminderCategory>,
    pub reminder_type: Option<ReminderType>,
    pub assigned_to: Option<String>,
    pub related_case: Option<String>,
    pub contract_party1: Option<String>,
    pub contract_party2: Option<String>,
    pub extracted_context: Option<String>,
    pub document_id: Option<DbId>,
    pub status: Option<ReminderStatus>,
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Treat an empty string as absent.
pub fn empty_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ReminderPayload {
    /// Drop empty strings from the optional free-text and reference fields so
    /// they are stored as genuinely absent.
    pub fn normalize(mut self) -> Self {
        self.document_id = empty_to_none(self.document_id);
        self.assigned_to = empty_to_none(self.assigned_to);
        self.related_case = empty_to_none(self.related_case);
        self.contract_party1 = empty_to_none(self.contract_party1);
        self.contract_party2 = empty_to_none(self.contract_party2);
        self.extracted_context = empty_to_none(self.extracted_context);
        self
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn parse_date_field<Tz: TimeZone>(
    tz: &Tz,
    value: Option<&str>,
    message: &str,
    errors: &mut Vec<String>,
) -> Option<Timestamp> {
    let value = value?;
    let parsed = parse_timestamp_in(tz, value);
    if parsed.is_none() {
        errors.push(message.to_string());
    }
    parsed
}

fn parse_document_id(value: Option<&str>, errors: &mut Vec<String>) -> Option<DbId> {
    let value = value?;
    match object_id::parse(value) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(MSG_DOCUMENT_ID.to_string());
            None
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate a create payload and apply defaults.
///
/// `tz` resolves date-times that carry no offset.
pub fn prepare_new<Tz: TimeZone>(tz: &Tz, payload: ReminderPayload) -> Result<NewReminder, CoreError> {
    let p = payload.normalize();
    let mut errors = Vec::new();

    let title = p.title.clone().filter(|t| !is_blank(t));
    if title.is_none() {
        errors.push(MSG_TITLE_REQUIRED.to_string());
    }

    let due_date = parse_date_field(tz, p.due_date.as_deref(), MSG_DUE_DATE, &mut errors);
    if p.due_date.is_none() {
        errors.push(MSG_DUE_DATE.to_string());
    }
    let reminder_date =
        parse_date_field(tz, p.reminder_date.as_deref(), MSG_REMINDER_DATE, &mut errors);
    if p.reminder_date.is_none() {
        errors.push(MSG_REMINDER_DATE.to_string());
    }

    let term_start_date = parse_date_field(
        tz,
        empty_to_none(p.term_start_date).as_deref(),
        MSG_TERM_START_DATE,
        &mut errors,
    );
    let term_end_date = parse_date_field(
        tz,
        empty_to_none(p.term_end_date).as_deref(),
        MSG_TERM_END_DATE,
        &mut errors,
    );

    let category = parse_optional::<ReminderCategory>(p.category.as_deref(), &mut errors);
    if p.category.is_none() {
        errors.push(MSG_CATEGORY_REQUIRED.to_string());
    }
    let priority = parse_optional::<ReminderPriority>(p.priority.as_deref(), &mut errors);
    let reminder_type = parse_optional::<ReminderType>(p.reminder_type.as_deref(), &mut errors);
    let status = parse_optional::<ReminderStatus>(p.status.as_deref(), &mut errors);
    let document_id = parse_document_id(p.document_id.as_deref(), &mut errors);

    match (title, due_date, reminder_date, category) {
        (Some(title), Some(due_date), Some(reminder_date), Some(category)) if errors.is_empty() => {
            Ok(NewReminder {
                title,
                description: p.description.unwrap_or_default(),
                due_date,
                reminder_date,
                term_start_date,
                term_end_date,
                priority: priority.unwrap_or_default(),
                category,
                reminder_type: reminder_type.unwrap_or_default(),
                assigned_to: p.assigned_to,
                related_case: p.related_case,
                contract_party1: p.contract_party1,
                contract_party2: p.contract_party2,
                extracted_context: p.extracted_context,
                document_id,
                status: status.unwrap_or_default(),
            })
        }
        _ => Err(CoreError::Validation(errors)),
    }
}

/// Validate an update payload. Only supplied fields are checked.
pub fn prepare_patch<Tz: TimeZone>(
    tz: &Tz,
    payload: ReminderPayload,
) -> Result<ReminderPatch, CoreError> {
    let p = payload.normalize();
    let mut errors = Vec::new();

    if p.title.as_deref().is_some_and(is_blank) {
        errors.push(MSG_TITLE_REQUIRED.to_string());
    }

    let patch = ReminderPatch {
        due_date: parse_date_field(tz, p.due_date.as_deref(), MSG_DUE_DATE, &mut errors),
        reminder_date: parse_date_field(
            tz,
            p.reminder_date.as_deref(),
            MSG_REMINDER_DATE,
            &mut errors,
        ),
        term_start_date: parse_date_field(
            tz,
            empty_to_none(p.term_start_date).as_deref(),
            MSG_TERM_START_DATE,
            &mut errors,
        ),
        term_end_date: parse_date_field(
            tz,
            empty_to_none(p.term_end_date).as_deref(),
            MSG_TERM_END_DATE,
            &mut errors,
        ),
        priority: parse_optional(p.priority.as_deref(), &mut errors),
        category: parse_optional(p.category.as_deref(), &mut errors),
        reminder_type: parse_optional(p.reminder_type.as_deref(), &mut errors),
        status: parse_optional(p.status.as_deref(), &mut errors),
        document_id: parse_document_id(p.document_id.as_deref(), &mut errors),
        title: p.title,
        description: p.description,
        assigned_to: p.assigned_to,
        related_case: p.related_case,
        contract_party1: p.contract_party1,
        contract_party2: p.contract_party2,
        extracted_context: p.extracted_context,
    };

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(CoreError::Validation(errors))
    }
}

/// Validate a snooze request, returning the new notification instant.
///
/// Snoozing moves `reminderDate` to this instant and records it as
/// `snoozeUntil`; the status becomes [`ReminderStatus::Snoozed`].
pub fn prepare_snooze<Tz: TimeZone>(tz: &Tz, payload: &SnoozePayload) -> Result<Timestamp, CoreError> {
    payload
        .snooze_until
        .as_deref()
        .and_then(|v| parse_timestamp_in(tz, v))
        .ok_or_else(|| CoreError::invalid(MSG_SNOOZE_DATE))
}

// ---------------------------------------------------------------------------
// List filter
// ---------------------------------------------------------------------------

/// Equality filter for listing reminders. `None` means no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderFilter {
    pub status: Option<ReminderStatus>,
    pub reminder_type: Option<ReminderType>,
    pub priority: Option<ReminderPriority>,
}

/// Read a list-filter value: empty and `all` impose no constraint.
pub fn filter_value(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != "all")
}

impl ReminderFilter {
    /// Build a filter from raw query values.
    pub fn parse(
        status: Option<&str>,
        reminder_type: Option<&str>,
        priority: Option<&str>,
    ) -> Result<Self, CoreError> {
        let mut errors = Vec::new();
        let filter = ReminderFilter {
            status: parse_optional(filter_value(status), &mut errors),
            reminder_type: parse_optional(filter_value(reminder_type), &mut errors),
            priority: parse_optional(filter_value(priority), &mut errors),
        };
        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(CoreError::Validation(errors))
        }
    }
}
