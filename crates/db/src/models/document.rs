//! Document model.

use docket_core::documents::{DocumentCategory, ExtractedDate};
use docket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `documents` table.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: DbId,
    /// Storage-assigned name of the file under the upload directory.
    pub filename: String,
    pub original_name: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub category: DocumentCategory,
    pub tags: Vec<String>,
    pub size: i64,
    pub mimetype: String,
    pub upload_date: Timestamp,
    #[sqlx(json)]
    pub extracted_dates: Vec<ExtractedDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
