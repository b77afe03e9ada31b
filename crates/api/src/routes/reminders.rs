use axum::routing::{get, put};
use axum::Router;

use crate::handlers::reminders;
use crate::state::AppState;

/// Reminder routes mounted at `/reminders`.
///
/// ```text
/// GET    /                 -> list_reminders
/// POST   /                 -> create_reminder
/// GET    /today            -> today_reminders
/// GET    /{id}             -> get_reminder
/// PUT    /{id}             -> update_reminder
/// DELETE /{id}             -> delete_reminder
/// PUT    /{id}/dismiss     -> dismiss_reminder
/// PUT    /{id}/snooze      -> snooze_reminder
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(reminders::list_reminders).post(reminders::create_reminder),
        )
        .route("/today", get(reminders::today_reminders))
        .route(
            "/{id}",
            get(reminders::get_reminder)
                .put(reminders::update_reminder)
                .delete(reminders::delete_reminder),
        )
        .route("/{id}/dismiss", put(reminders::dismiss_reminder))
        .route("/{id}/snooze", put(reminders::snooze_reminder))
}
