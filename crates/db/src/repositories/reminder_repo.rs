//! Repository for the `reminders` table.

use docket_core::object_id;
use docket_core::reminders::{NewReminder, ReminderFilter, ReminderPatch, ReminderStatus};
use docket_core::time::DateRange;
use docket_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::reminder::Reminder;

/// Column list for reminders queries.
const COLUMNS: &str = "id, title, description, due_date, reminder_date, term_start_date, \
    term_end_date, priority, category, reminder_type, assigned_to, related_case, \
    contract_party1, contract_party2, extracted_context, document_id, status, snooze_until, \
    external_event_ref, created_at, updated_at";

/// Provides CRUD and lifecycle operations for reminders.
pub struct ReminderRepo;

impl ReminderRepo {
    /// Insert a new reminder under a freshly generated id.
    pub async fn create(pool: &PgPool, input: &NewReminder) -> Result<Reminder, sqlx::Error> {
        let query = format!(
            "INSERT INTO reminders
                (id, title, description, due_date, reminder_date, term_start_date, term_end_date,
                 priority, category, reminder_type, assigned_to, related_case, contract_party1,
                 contract_party2, extracted_context, document_id, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reminder>(&query)
            .bind(object_id::generate())
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(input.reminder_date)
            .bind(input.term_start_date)
            .bind(input.term_end_date)
            .bind(input.priority.as_str())
            .bind(input.category.as_str())
            .bind(input.reminder_type.as_str())
            .bind(&input.assigned_to)
            .bind(&input.related_case)
            .bind(&input.contract_party1)
            .bind(&input.contract_party2)
            .bind(&input.extracted_context)
            .bind(&input.document_id)
            .bind(input.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a reminder by its id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Reminder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reminders WHERE id = $1");
        sqlx::query_as::<_, Reminder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List reminders matching every supplied equality filter, earliest due first.
    pub async fn list(pool: &PgPool, filter: &ReminderFilter) -> Result<Vec<Reminder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reminders
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::TEXT IS NULL OR reminder_type = $2)
               AND ($3::TEXT IS NULL OR priority = $3)
             ORDER BY due_date ASC, created_at ASC"
        );
        sqlx::query_as::<_, Reminder>(&query)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.reminder_type.map(|t| t.as_str()))
            .bind(filter.priority.map(|p| p.as_str()))
            .fetch_all(pool)
            .await
    }

    /// List reminders with the given status whose `reminder_date` falls in
    /// `window` (upper bound exclusive), earliest first.
    pub async fn list_due_in(
        pool: &PgPool,
        window: &DateRange,
        status: ReminderStatus,
    ) -> Result<Vec<Reminder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reminders
             WHERE reminder_date >= $1 AND reminder_date < $2 AND status = $3
             ORDER BY reminder_date ASC"
        );
        sqlx::query_as::<_, Reminder>(&query)
            .bind(window.start)
            .bind(window.end)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
    }

    /// Merge a partial update onto a reminder, returning the merged row.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &ReminderPatch,
    ) -> Result<Option<Reminder>, sqlx::Error> {
        let query = format!(
            "UPDATE reminders SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                due_date = COALESCE($4, due_date),
                reminder_date = COALESCE($5, reminder_date),
                term_start_date = COALESCE($6, term_start_date),
                term_end_date = COALESCE($7, term_end_date),
                priority = COALESCE($8, priority),
                category = COALESCE($9, category),
                reminder_type = COALESCE($10, reminder_type),
                assigned_to = COALESCE($11, assigned_to),
                related_case = COALESCE($12, related_case),
                contract_party1 = COALESCE($13, contract_party1),
                contract_party2 = COALESCE($14, contract_party2),
                extracted_context = COALESCE($15, extracted_context),
                document_id = COALESCE($16, document_id),
                status = COALESCE($17, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reminder>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(input.reminder_date)
            .bind(input.term_start_date)
            .bind(input.term_end_date)
            .bind(input.priority.map(|v| v.as_str()))
            .bind(input.category.map(|v| v.as_str()))
            .bind(input.reminder_type.map(|v| v.as_str()))
            .bind(&input.assigned_to)
            .bind(&input.related_case)
            .bind(&input.contract_party1)
            .bind(&input.contract_party2)
            .bind(&input.extracted_context)
            .bind(&input.document_id)
            .bind(input.status.map(|v| v.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Set the status unconditionally. Repeating the call is harmless.
    pub async fn set_status(
        pool: &PgPool,
        id: &str,
        status: ReminderStatus,
    ) -> Result<Option<Reminder>, sqlx::Error> {
        let query = format!(
            "UPDATE reminders SET status = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reminder>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Snooze a reminder: status, `snooze_until`, and `reminder_date` change together.
    pub async fn snooze(
        pool: &PgPool,
        id: &str,
        until: Timestamp,
    ) -> Result<Option<Reminder>, sqlx::Error> {
        let query = format!(
            "UPDATE reminders SET
                status = $2,
                snooze_until = $3,
                reminder_date = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reminder>(&query)
            .bind(id)
            .bind(ReminderStatus::Snoozed.as_str())
            .bind(until)
            .fetch_optional(pool)
            .await
    }

    /// Record the calendar event id after a successful sync.
    pub async fn set_external_ref(
        pool: &PgPool,
        id: &str,
        external_ref: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE reminders SET external_event_ref = $2 WHERE id = $1")
            .bind(id)
            .bind(external_ref)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a reminder, returning the removed row.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<Option<Reminder>, sqlx::Error> {
        let query = format!("DELETE FROM reminders WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Reminder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
