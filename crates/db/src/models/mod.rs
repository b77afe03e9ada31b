pub mod document;
pub mod event;
pub mod populated;
pub mod reminder;
