//! Record identifier generation and validation.
//!
//! Identifiers are BSON ObjectIds rendered as 24 lowercase hex characters.
//! Clients may send ids in either case.

use bson::oid::ObjectId;

use crate::error::CoreError;
use crate::types::DbId;

/// Generate a fresh identifier for the current instant.
pub fn generate() -> DbId {
    ObjectId::new().to_hex()
}

/// Validate an inbound identifier and return its canonical lowercase form.
pub fn parse(value: &str) -> Result<DbId, CoreError> {
    ObjectId::parse_str(value)
        .map(|oid| oid.to_hex())
        .map_err(|_| CoreError::InvalidId(value.to_string()))
}
