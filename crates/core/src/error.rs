use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// One or more input checks failed. Every failing check contributes a message.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}

impl CoreError {
    /// Shorthand for a validation failure with a single message.
    pub fn invalid(message: impl Into<String>) -> Self {
        CoreError::Validation(vec![message.into()])
    }
}
