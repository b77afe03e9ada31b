pub mod ai;
pub mod documents;
pub mod events;
pub mod health;
pub mod reminders;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /health                     service and database health
///
/// /reminders                  list, create
/// /reminders/today            active reminders due today
/// /reminders/{id}             get, update, delete
/// /reminders/{id}/dismiss     dismiss (PUT)
/// /reminders/{id}/snooze      snooze (PUT)
///
/// /events                     list (date/month/year/type/status), create
/// /events/{id}                get, update, delete
///
/// /documents                  list (category/tag/search), upload
/// /documents/{id}             get, update, delete
///
/// /ai/chat                    501
/// /ai/analyze/{id}            501
/// /ai/summarize               501
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/reminders", reminders::router())
        .nest("/events", events::router())
        .nest("/documents", documents::router())
        .nest("/ai", ai::router())
}
