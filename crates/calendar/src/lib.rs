//! Outward calendar synchronisation.
//!
//! A [`CalendarProvider`] mirrors reminders and events into an external
//! calendar. Providers surface every failure as a typed [`CalendarError`];
//! deciding that a failure is non-fatal is the caller's job.

pub mod error;
pub mod google;
pub mod payload;
pub mod provider;

pub use error::CalendarError;
pub use google::{GoogleCalendar, GoogleCalendarConfig};
pub use payload::{CalendarEvent, SyncSource};
pub use provider::CalendarProvider;
