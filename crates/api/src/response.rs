//! Response envelope types for API handlers.
//!
//! Mutations answer `{ "message": ..., "<entity>": ... }`; list and get
//! endpoints return the bare entity or array.

use serde::Serialize;

/// `{ "message": ... }` body for deletions.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// `{ "message": ..., "reminder": T }`.
#[derive(Debug, Serialize)]
pub struct ReminderResponse<T: Serialize> {
    pub message: &'static str,
    pub reminder: T,
}

/// `{ "message": ..., "event": T }`.
#[derive(Debug, Serialize)]
pub struct EventResponse<T: Serialize> {
    pub message: &'static str,
    pub event: T,
}

/// `{ "message": ..., "document": T }`.
#[derive(Debug, Serialize)]
pub struct DocumentResponse<T: Serialize> {
    pub message: &'static str,
    pub document: T,
}
