pub mod documents;
pub mod error;
pub mod events;
pub mod labels;
pub mod object_id;
pub mod reminders;
pub mod time;
pub mod types;
