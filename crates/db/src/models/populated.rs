//! Records with their referenced document joined in.
//!
//! Reminders and events hold a weak reference to a document. When a record
//! is returned to a client, the reference is replaced by the document itself
//! under the same `documentId` key:
//!
//! - no reference: the key is omitted
//! - reference to an existing document: the document object
//! - dangling reference (document deleted): `null`

use std::collections::HashMap;

use docket_core::types::DbId;
use serde::Serialize;

use crate::models::document::Document;

/// A record that may reference a document.
pub trait DocumentRef {
    fn document_ref(&self) -> Option<&str>;
}

/// A record together with its resolved document reference.
#[derive(Debug, Clone, Serialize)]
pub struct Populated<T> {
    #[serde(flatten)]
    pub record: T,
    #[serde(rename = "documentId", skip_serializing_if = "Option::is_none")]
    pub document: Option<Option<Document>>,
}

impl<T: DocumentRef> Populated<T> {
    /// Resolve `record`'s reference against an id-indexed document map.
    pub fn resolve(record: T, documents: &HashMap<DbId, Document>) -> Self {
        let document = record
            .document_ref()
            .map(|id| documents.get(id).cloned());
        Self { record, document }
    }
}
