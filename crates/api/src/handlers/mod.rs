pub mod ai;
pub mod documents;
pub mod events;
pub mod reminders;
