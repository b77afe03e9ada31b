use std::sync::Arc;

use crate::config::ServerConfig;
use crate::sync::CalendarSync;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: docket_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Calendar mirror; disabled when no credentials are configured.
    pub calendar: Arc<CalendarSync>,
}
