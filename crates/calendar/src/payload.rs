//! Calendar event bodies built from reminders and events.

use chrono::Duration;
use docket_core::types::Timestamp;
use serde::Serialize;

/// Minutes before the event at which the popup notification fires.
const POPUP_MINUTES: i64 = 30;

/// Largest override the Calendar v3 API accepts (four weeks).
const MAX_OVERRIDE_MINUTES: i64 = 40_320;

/// Provider-independent view of a record to be mirrored.
///
/// Labels are the wire strings of the record's enums, so the same builder
/// serves both reminders and events.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSource {
    pub title: String,
    pub description: Option<String>,
    pub due: Timestamp,
    pub remind_at: Timestamp,
    pub priority: String,
    pub category: String,
    pub kind: String,
    pub assigned_to: Option<String>,
    pub related_case: Option<String>,
    pub party1: Option<String>,
    pub party2: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderOverride {
    pub method: &'static str,
    pub minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

/// Calendar v3 event resource, limited to the fields we write.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<EventReminders>,
    pub color_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl CalendarEvent {
    /// Body for inserting a new event, including notification overrides.
    pub fn for_create(source: &SyncSource, time_zone: &str) -> Self {
        let mut event = Self::for_update(source, time_zone);
        event.reminders = Some(EventReminders {
            use_default: false,
            overrides: vec![
                ReminderOverride {
                    method: "email",
                    minutes: lead_minutes(source.due, source.remind_at),
                },
                ReminderOverride {
                    method: "popup",
                    minutes: POPUP_MINUTES,
                },
            ],
        });
        event
    }

    /// Body for replacing an existing event. Notifications are left as set.
    pub fn for_update(source: &SyncSource, time_zone: &str) -> Self {
        let end = source.due + Duration::hours(1);
        CalendarEvent {
            summary: format!("⏰ {}", source.title),
            description: describe(source),
            start: EventTime {
                date_time: source.due.to_rfc3339(),
                time_zone: time_zone.to_string(),
            },
            end: EventTime {
                date_time: end.to_rfc3339(),
                time_zone: time_zone.to_string(),
            },
            reminders: None,
            color_id: color_for(&source.priority).to_string(),
            location: location_for(source),
        }
    }
}

/// Whole minutes between the reminder instant and the due instant.
pub fn lead_minutes(due: Timestamp, remind_at: Timestamp) -> i64 {
    (due - remind_at).num_minutes().clamp(0, MAX_OVERRIDE_MINUTES)
}

/// Calendar colour id for a priority label.
pub fn color_for(priority: &str) -> &'static str {
    match priority {
        "urgent" => "11",
        "high" => "6",
        "medium" => "5",
        "low" => "2",
        _ => "1",
    }
}

fn location_for(source: &SyncSource) -> Option<String> {
    match source.kind.as_str() {
        "court" | "meeting" => Some(
            source
                .related_case
                .clone()
                .unwrap_or_else(|| "TBD".to_string()),
        ),
        _ => None,
    }
}

fn describe(source: &SyncSource) -> String {
    let mut out = source.description.clone().unwrap_or_default();
    out.push_str(&format!("\n\n📋 Category: {}", source.category));
    out.push_str(&format!("\n🎯 Priority: {}", source.priority));
    out.push_str(&format!("\n📝 Type: {}", source.kind));
    if let Some(assigned) = &source.assigned_to {
        out.push_str(&format!("\n👤 Assigned To: {assigned}"));
    }
    if let Some(case) = &source.related_case {
        out.push_str(&format!("\n📂 Related Case: {case}"));
    }
    if source.party1.is_some() || source.party2.is_some() {
        out.push_str(&format!(
            "\n🤝 Parties: {} - {}",
            source.party1.as_deref().unwrap_or_default(),
            source.party2.as_deref().unwrap_or_default()
        ));
    }
    out
}
