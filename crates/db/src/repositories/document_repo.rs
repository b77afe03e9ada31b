//! Repository for the `documents` table.

use std::collections::HashMap;

use docket_core::documents::{like_pattern, DocumentFilter, DocumentPatch, NewDocument};
use docket_core::object_id;
use docket_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::document::Document;
use crate::models::populated::{DocumentRef, Populated};

/// Column list for documents queries.
const COLUMNS: &str = "id, filename, original_name, description, category, tags, size, \
    mimetype, upload_date, extracted_dates, created_at, updated_at";

/// Provides CRUD operations for uploaded documents, plus reference population
/// for records that point at them.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert metadata for a stored upload under a freshly generated id.
    pub async fn create(pool: &PgPool, input: &NewDocument) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents
                (id, filename, original_name, description, category, tags, size, mimetype,
                 extracted_dates)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(object_id::generate())
            .bind(&input.filename)
            .bind(&input.original_name)
            .bind(&input.description)
            .bind(input.category.as_str())
            .bind(&input.tags)
            .bind(input.size)
            .bind(&input.mimetype)
            .bind(Json(&input.extracted_dates))
            .fetch_one(pool)
            .await
    }

    /// Find a document by its id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every document whose id is in `ids`. Missing ids are skipped.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Document>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = ANY($1)");
        sqlx::query_as::<_, Document>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List documents, newest upload first.
    pub async fn list(pool: &PgPool, filter: &DocumentFilter) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE ($1::TEXT IS NULL OR category = $1)
               AND ($2::TEXT IS NULL OR $2 = ANY(tags))
               AND ($3::TEXT IS NULL OR original_name ILIKE $3 OR description ILIKE $3)
             ORDER BY upload_date DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(filter.category.map(|c| c.as_str()))
            .bind(filter.tag.as_deref())
            .bind(filter.search.as_deref().map(like_pattern))
            .fetch_all(pool)
            .await
    }

    /// Merge a partial update onto a document, returning the merged row.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &DocumentPatch,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET
                description = COALESCE($2, description),
                category = COALESCE($3, category),
                tags = COALESCE($4, tags),
                extracted_dates = COALESCE($5, extracted_dates)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(&input.description)
            .bind(input.category.map(|c| c.as_str()))
            .bind(&input.tags)
            .bind(input.extracted_dates.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a document, returning the removed row.
    ///
    /// Records referencing the document are left as they are.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("DELETE FROM documents WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace each record's document reference with the document itself.
    ///
    /// Issues a single lookup for all distinct references.
    pub async fn populate<T: DocumentRef>(
        pool: &PgPool,
        records: Vec<T>,
    ) -> Result<Vec<Populated<T>>, sqlx::Error> {
        let mut ids: Vec<DbId> = records
            .iter()
            .filter_map(|r| r.document_ref().map(str::to_string))
            .collect();
        ids.sort();
        ids.dedup();

        let documents: HashMap<DbId, Document> = Self::find_many(pool, &ids)
            .await?
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();

        Ok(records
            .into_iter()
            .map(|r| Populated::resolve(r, &documents))
            .collect())
    }

    /// Populate a single record.
    pub async fn populate_one<T: DocumentRef>(
        pool: &PgPool,
        record: T,
    ) -> Result<Populated<T>, sqlx::Error> {
        let documents = match record.document_ref() {
            Some(id) => Self::find_by_id(pool, id)
                .await?
                .map(|d| HashMap::from([(d.id.clone(), d)]))
                .unwrap_or_default(),
            None => HashMap::new(),
        };
        Ok(Populated::resolve(record, &documents))
    }
}
