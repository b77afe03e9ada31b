//! Handlers for reminders.
//!
//! Responses always carry the referenced document in place of its id.
//! Calendar sync never affects the response: creation mirrors in the
//! background, updates and deletes mirror inline and only log failures.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Local;
use docket_core::error::CoreError;
use docket_core::object_id;
use docket_core::reminders::{
    self, ReminderFilter, ReminderPayload, ReminderStatus, SnoozePayload,
};
use docket_core::time::today_window;
use docket_db::repositories::{DocumentRepo, ReminderRepo};

use crate::error::{json_or_default, AppResult, ValidatedJson, ValidatedQuery};
use crate::query::ReminderListParams;
use crate::response::{MessageResponse, ReminderResponse};
use crate::state::AppState;
use crate::sync::{reminder_source, spawn_reminder_create};

fn not_found(id: String) -> CoreError {
    CoreError::NotFound {
        entity: "Reminder",
        id,
    }
}

/// GET /api/reminders
///
/// List reminders matching the optional `status`, `type`, and `priority`
/// filters, ordered by due date.
pub async fn list_reminders(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ReminderListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = ReminderFilter::parse(
        params.status.as_deref(),
        params.reminder_type.as_deref(),
        params.priority.as_deref(),
    )?;
    let reminders = ReminderRepo::list(&state.pool, &filter).await?;
    let populated = DocumentRepo::populate(&state.pool, reminders).await?;

    Ok(Json(populated))
}

/// GET /api/reminders/today
///
/// Active reminders whose reminder date falls within the current local day.
pub async fn today_reminders(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let window = today_window(&Local::now());
    let reminders = ReminderRepo::list_due_in(&state.pool, &window, ReminderStatus::Active).await?;
    let populated = DocumentRepo::populate(&state.pool, reminders).await?;

    Ok(Json(populated))
}

/// GET /api/reminders/{id}
pub async fn get_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = object_id::parse(&id)?;
    let reminder = ReminderRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DocumentRepo::populate_one(&state.pool, reminder).await?))
}

/// POST /api/reminders
///
/// Validate, apply defaults, persist, and start the calendar mirror.
pub async fn create_reminder(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ReminderPayload>,
) -> AppResult<impl IntoResponse> {
    let input = reminders::prepare_new(&Local, payload)?;
    let reminder = ReminderRepo::create(&state.pool, &input).await?;

    tracing::info!(reminder_id = %reminder.id, category = %reminder.category, "Reminder created");

    spawn_reminder_create(state.pool.clone(), state.calendar.clone(), &reminder);

    let populated = DocumentRepo::populate_one(&state.pool, reminder).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReminderResponse {
            message: "Reminder created successfully",
            reminder: populated,
        }),
    ))
}

/// PUT /api/reminders/{id}
///
/// Merge the supplied fields onto the stored reminder.
pub async fn update_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ReminderPayload>,
) -> AppResult<impl IntoResponse> {
    let id = object_id::parse(&id)?;
    let patch = reminders::prepare_patch(&Local, payload)?;
    let reminder = ReminderRepo::update(&state.pool, &id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(reminder_id = %reminder.id, "Reminder updated");

    if let Some(external_ref) = &reminder.external_event_ref {
        state
            .calendar
            .update(external_ref, &reminder_source(&reminder))
            .await;
    }

    let populated = DocumentRepo::populate_one(&state.pool, reminder).await?;
    Ok(Json(ReminderResponse {
        message: "Reminder updated successfully",
        reminder: populated,
    }))
}

/// PUT /api/reminders/{id}/dismiss
pub async fn dismiss_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = object_id::parse(&id)?;
    let reminder = ReminderRepo::set_status(&state.pool, &id, ReminderStatus::Dismissed)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(reminder_id = %reminder.id, "Reminder dismissed");

    let populated = DocumentRepo::populate_one(&state.pool, reminder).await?;
    Ok(Json(ReminderResponse {
        message: "Reminder dismissed successfully",
        reminder: populated,
    }))
}

/// PUT /api/reminders/{id}/snooze
///
/// Move the reminder date to `snoozeUntil` and mark the reminder snoozed.
/// An empty body counts as a missing `snoozeUntil`.
pub async fn snooze_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let id = object_id::parse(&id)?;
    let payload: SnoozePayload = json_or_default(&body)?;
    let until = reminders::prepare_snooze(&Local, &payload)?;
    let reminder = ReminderRepo::snooze(&state.pool, &id, until)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(reminder_id = %reminder.id, snooze_until = %until, "Reminder snoozed");

    let populated = DocumentRepo::populate_one(&state.pool, reminder).await?;
    Ok(Json(ReminderResponse {
        message: "Reminder snoozed successfully",
        reminder: populated,
    }))
}

/// DELETE /api/reminders/{id}
///
/// The local delete always stands; removing the calendar mirror is
/// best-effort.
pub async fn delete_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = object_id::parse(&id)?;
    let reminder = ReminderRepo::delete(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(reminder_id = %reminder.id, "Reminder deleted");

    if let Some(external_ref) = &reminder.external_event_ref {
        state.calendar.delete(external_ref).await;
    }

    Ok(Json(MessageResponse {
        message: "Reminder deleted successfully",
    }))
}
