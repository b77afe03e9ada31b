//! Repository for the `events` table.

use docket_core::events::{EventFilter, EventPatch, NewEvent};
use docket_core::object_id;
use sqlx::PgPool;

use crate::models::event::Event;

/// Column list for events queries.
const COLUMNS: &str = "id, title, description, event_date, event_time, event_type, \
    document_id, location, attendees, status, external_event_ref, created_at, updated_at";

/// Provides CRUD operations for calendar events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event under a freshly generated id.
    pub async fn create(pool: &PgPool, input: &NewEvent) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events
                (id, title, description, event_date, event_time, event_type, document_id,
                 location, attendees, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(object_id::generate())
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.date)
            .bind(&input.time)
            .bind(input.event_type.as_str())
            .bind(&input.document_id)
            .bind(&input.location)
            .bind(&input.attendees)
            .bind(input.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find an event by its id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List events in chronological order, restricted by an optional
    /// half-open date range and equality filters.
    pub async fn list(pool: &PgPool, filter: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE ($1::TIMESTAMPTZ IS NULL OR event_date >= $1)
               AND ($2::TIMESTAMPTZ IS NULL OR event_date < $2)
               AND ($3::TEXT IS NULL OR event_type = $3)
               AND ($4::TEXT IS NULL OR status = $4)
             ORDER BY event_date ASC, event_time ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(filter.range.map(|r| r.start))
            .bind(filter.range.map(|r| r.end))
            .bind(filter.event_type.map(|t| t.as_str()))
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await
    }

    /// Merge a partial update onto an event, returning the merged row.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &EventPatch,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                event_time = COALESCE($5, event_time),
                event_type = COALESCE($6, event_type),
                document_id = COALESCE($7, document_id),
                location = COALESCE($8, location),
                attendees = COALESCE($9, attendees),
                status = COALESCE($10, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.date)
            .bind(&input.time)
            .bind(input.event_type.map(|v| v.as_str()))
            .bind(&input.document_id)
            .bind(&input.location)
            .bind(&input.attendees)
            .bind(input.status.map(|v| v.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Record the calendar event id after a successful sync.
    pub async fn set_external_ref(
        pool: &PgPool,
        id: &str,
        external_ref: &str,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET external_event_ref = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(external_ref)
            .fetch_optional(pool)
            .await
    }

    /// Delete an event, returning the removed row.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("DELETE FROM events WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
