//! Handlers for calendar events.
//!
//! Unlike reminders, event creation waits for the calendar mirror so the
//! response already carries the external id when sync succeeds.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Local;
use docket_core::error::CoreError;
use docket_core::events::{self, EventFilter, EventPayload};
use docket_core::object_id;
use docket_db::repositories::{DocumentRepo, EventRepo};

use crate::error::{AppResult, ValidatedJson, ValidatedQuery};
use crate::query::EventListParams;
use crate::response::{EventResponse, MessageResponse};
use crate::state::AppState;
use crate::sync::event_source;

fn not_found(id: String) -> CoreError {
    CoreError::NotFound { entity: "Event", id }
}

/// GET /api/events
///
/// Filter by `date`, `month`+`year`, or `year` (in that precedence), plus
/// optional `type` and `status`. Sorted by date then time.
pub async fn list_events(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<EventListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = EventFilter::parse(
        &Local,
        params.date.as_deref(),
        params.month.as_deref(),
        params.year.as_deref(),
        params.event_type.as_deref(),
        params.status.as_deref(),
    )?;
    let events = EventRepo::list(&state.pool, &filter).await?;
    let populated = DocumentRepo::populate(&state.pool, events).await?;

    Ok(Json(populated))
}

/// GET /api/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = object_id::parse(&id)?;
    let event = EventRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DocumentRepo::populate_one(&state.pool, event).await?))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<EventPayload>,
) -> AppResult<impl IntoResponse> {
    let input = events::prepare_new(&Local, payload)?;
    let mut event = EventRepo::create(&state.pool, &input).await?;

    tracing::info!(event_id = %event.id, event_type = %event.event_type, "Event created");

    if let Some(external_ref) = state.calendar.create(&event_source(&event)).await {
        match EventRepo::set_external_ref(&state.pool, &event.id, &external_ref).await {
            Ok(Some(synced)) => event = synced,
            Ok(None) => {
                tracing::warn!(event_id = %event.id, "Event removed before calendar id was recorded");
            }
            Err(e) => {
                tracing::error!(event_id = %event.id, error = %e, "Failed to record calendar event id");
            }
        }
    }

    let populated = DocumentRepo::populate_one(&state.pool, event).await?;
    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            message: "Event created successfully",
            event: populated,
        }),
    ))
}

/// PUT /api/events/{id}
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<EventPayload>,
) -> AppResult<impl IntoResponse> {
    let id = object_id::parse(&id)?;
    let patch = events::prepare_patch(&Local, payload)?;
    let event = EventRepo::update(&state.pool, &id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(event_id = %event.id, "Event updated");

    if let Some(external_ref) = &event.external_event_ref {
        state
            .calendar
            .update(external_ref, &event_source(&event))
            .await;
    }

    let populated = DocumentRepo::populate_one(&state.pool, event).await?;
    Ok(Json(EventResponse {
        message: "Event updated successfully",
        event: populated,
    }))
}

/// DELETE /api/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = object_id::parse(&id)?;
    let event = EventRepo::delete(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(event_id = %event.id, "Event deleted");

    if let Some(external_ref) = &event.external_event_ref {
        state.calendar.delete(external_ref).await;
    }

    Ok(Json(MessageResponse {
        message: "Event deleted successfully",
    }))
}
