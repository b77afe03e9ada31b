/// Error type for calendar provider operations.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    /// The service-account credentials could not be used.
    #[error("Invalid calendar credentials: {0}")]
    Credentials(String),

    /// Signing the token assertion failed.
    #[error("Token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("Calendar provider returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The provider answered 2xx but the body was not what we expected.
    #[error("Unexpected calendar provider response: {0}")]
    InvalidResponse(String),
}
