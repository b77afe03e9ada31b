pub mod document_repo;
pub mod event_repo;
pub mod reminder_repo;

pub use document_repo::DocumentRepo;
pub use event_repo::EventRepo;
pub use reminder_repo::ReminderRepo;
