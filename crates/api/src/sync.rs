//! Best-effort calendar mirroring.
//!
//! [`CalendarSync`] is the single place where calendar failures are
//! absorbed: provider errors are logged and turned into `None` / `false`, so
//! no request ever fails because the calendar is unreachable.

use std::sync::Arc;

use docket_calendar::{CalendarEvent, CalendarError, CalendarProvider, GoogleCalendar, SyncSource};
use docket_core::events::{starts_at, EventType};
use docket_core::reminders::ReminderPriority;
use docket_db::models::event::Event;
use docket_db::models::reminder::Reminder;
use docket_db::repositories::ReminderRepo;
use docket_db::DbPool;
use tokio::task::JoinHandle;

/// Calendar mirror, either backed by a provider or disabled.
pub struct CalendarSync {
    provider: Option<Arc<dyn CalendarProvider>>,
    time_zone: String,
}

impl CalendarSync {
    /// A sync that mirrors through `provider`.
    pub fn new(provider: Arc<dyn CalendarProvider>, time_zone: impl Into<String>) -> Self {
        Self {
            provider: Some(provider),
            time_zone: time_zone.into(),
        }
    }

    /// A sync that never touches the network.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            time_zone: docket_calendar::google::DEFAULT_TIME_ZONE.to_string(),
        }
    }

    /// Build the Google-backed sync when credentials are configured.
    pub fn from_config(
        config: Option<docket_calendar::GoogleCalendarConfig>,
    ) -> Result<Self, CalendarError> {
        match config {
            Some(config) => {
                let calendar = GoogleCalendar::new(config)?;
                let time_zone = calendar.time_zone().to_string();
                Ok(Self::new(Arc::new(calendar), time_zone))
            }
            None => Ok(Self::disabled()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Create a mirrored event, returning its external id on success.
    pub async fn create(&self, source: &SyncSource) -> Option<String> {
        let provider = self.provider.as_ref()?;
        let event = CalendarEvent::for_create(source, &self.time_zone);
        match provider.create_event(&event).await {
            Ok(id) => {
                tracing::info!(provider = provider.name(), external_event_ref = %id, "Calendar event created");
                Some(id)
            }
            Err(e) => {
                tracing::warn!(provider = provider.name(), error = %e, "Failed to create calendar event");
                None
            }
        }
    }

    /// Replace a mirrored event. Returns whether the provider accepted it.
    pub async fn update(&self, external_id: &str, source: &SyncSource) -> bool {
        let Some(provider) = self.provider.as_ref() else {
            return false;
        };
        let event = CalendarEvent::for_update(source, &self.time_zone);
        match provider.update_event(external_id, &event).await {
            Ok(()) => {
                tracing::info!(provider = provider.name(), external_event_ref = external_id, "Calendar event updated");
                true
            }
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    external_event_ref = external_id,
                    error = %e,
                    "Failed to update calendar event"
                );
                false
            }
        }
    }

    /// Delete a mirrored event. Returns whether the provider accepted it.
    pub async fn delete(&self, external_id: &str) -> bool {
        let Some(provider) = self.provider.as_ref() else {
            return false;
        };
        match provider.delete_event(external_id).await {
            Ok(()) => {
                tracing::info!(provider = provider.name(), external_event_ref = external_id, "Calendar event deleted");
                true
            }
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    external_event_ref = external_id,
                    error = %e,
                    "Failed to delete calendar event"
                );
                false
            }
        }
    }
}

/// Mirror a newly created reminder in the background and record the
/// external id on success. If the reminder was deleted in the meantime the
/// new calendar event is removed again. Returns `None` when sync is disabled.
pub fn spawn_reminder_create(
    pool: DbPool,
    sync: Arc<CalendarSync>,
    reminder: &Reminder,
) -> Option<JoinHandle<()>> {
    if !sync.is_enabled() {
        return None;
    }
    let reminder_id = reminder.id.clone();
    let source = reminder_source(reminder);
    Some(tokio::spawn(async move {
        let Some(external_ref) = sync.create(&source).await else {
            return;
        };
        match ReminderRepo::set_external_ref(&pool, &reminder_id, &external_ref).await {
            Ok(true) => {
                tracing::debug!(reminder_id = %reminder_id, external_event_ref = %external_ref, "Recorded calendar event id");
            }
            Ok(false) => {
                tracing::warn!(reminder_id = %reminder_id, external_event_ref = %external_ref, "Reminder removed before calendar id was recorded, deleting calendar event");
                sync.delete(&external_ref).await;
            }
            Err(e) => {
                tracing::error!(reminder_id = %reminder_id, error = %e, "Failed to record calendar event id");
            }
        }
    }))
}

// ---------------------------------------------------------------------------
// Source mapping
// ---------------------------------------------------------------------------

/// Calendar view of a reminder.
pub fn reminder_source(r: &Reminder) -> SyncSource {
    SyncSource {
        title: r.title.clone(),
        description: Some(r.description.clone()).filter(|d| !d.is_empty()),
        due: r.due_date,
        remind_at: r.reminder_date,
        priority: r.priority.as_str().to_string(),
        category: r.category.as_str().to_string(),
        kind: r.reminder_type.as_str().to_string(),
        assigned_to: r.assigned_to.clone(),
        related_case: r.related_case.clone(),
        party1: r.contract_party1.clone(),
        party2: r.contract_party2.clone(),
    }
}

/// Calendar view of an event, shaped like a reminder due at the event's start.
pub fn event_source(e: &Event) -> SyncSource {
    let due = starts_at(e.event_date, &e.event_time);
    let priority = match e.event_type {
        EventType::Deadline | EventType::Court => ReminderPriority::High,
        _ => ReminderPriority::Medium,
    };
    let description = if e.description.is_empty() {
        let location = if e.location.is_empty() { "N/A" } else { &e.location };
        format!("Event Type: {}\nLocation: {location}", e.event_type)
    } else {
        e.description.clone()
    };
    SyncSource {
        title: e.title.clone(),
        description: Some(description),
        due,
        remind_at: due,
        priority: priority.as_str().to_string(),
        category: e.event_type.as_str().to_string(),
        kind: e.event_type.as_str().to_string(),
        assigned_to: None,
        related_case: None,
        party1: None,
        party2: None,
    }
}
