use async_trait::async_trait;

use crate::error::CalendarError;
use crate::payload::CalendarEvent;

/// An external calendar that can hold mirrored events.
///
/// Implementations perform a single attempt per call; there is no retry.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Create an event, returning the provider's identifier for it.
    async fn create_event(&self, event: &CalendarEvent) -> Result<String, CalendarError>;

    /// Replace the event identified by `external_id`.
    async fn update_event(
        &self,
        external_id: &str,
        event: &CalendarEvent,
    ) -> Result<(), CalendarError>;

    /// Delete the event identified by `external_id`.
    async fn delete_event(&self, external_id: &str) -> Result<(), CalendarError>;
}
