//! Handlers for uploaded documents.
//!
//! Binaries are written to the configured upload directory under a
//! server-assigned filename and served back under `/uploads/{filename}`.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use docket_core::documents::{
    self, DocumentFilter, DocumentPayload, NewDocument, MSG_NO_FILE,
};
use docket_core::error::CoreError;
use docket_core::object_id;
use docket_db::repositories::DocumentRepo;

use crate::error::{AppError, AppResult, ValidatedJson, ValidatedQuery};
use crate::query::DocumentListParams;
use crate::response::{DocumentResponse, MessageResponse};
use crate::state::AppState;

fn not_found(id: String) -> CoreError {
    CoreError::NotFound {
        entity: "Document",
        id,
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File exceeds the maximum upload size".to_string())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

/// File part of an upload form.
struct UploadedFile {
    original_name: String,
    mimetype: String,
    data: Vec<u8>,
}

/// Text fields of an upload form.
#[derive(Default)]
struct UploadFields {
    description: Option<String>,
    category: Option<String>,
    tags: Option<String>,
    extracted_dates: Option<String>,
}

/// GET /api/documents
///
/// Optional `category`, `tag`, and `search` filters; newest uploads first.
pub async fn list_documents(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<DocumentListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = DocumentFilter::parse(
        params.category.as_deref(),
        params.tag.as_deref(),
        params.search.as_deref(),
    )?;
    let documents = DocumentRepo::list(&state.pool, &filter).await?;

    Ok(Json(documents))
}

/// GET /api/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = object_id::parse(&id)?;
    let document = DocumentRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(document))
}

/// POST /api/documents
///
/// Accepts a multipart form with a required `file` field and optional
/// `description`, `category`, `tags`, and `extractedDates` fields.
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<impl IntoResponse> {
    let mut multipart = multipart.map_err(|_| AppError::BadRequest(MSG_NO_FILE.to_string()))?;
    let mut file: Option<UploadedFile> = None;
    let mut fields = UploadFields::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let original_name = field.file_name().unwrap_or("").to_string();
                let mimetype = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some(UploadedFile {
                    original_name,
                    mimetype,
                    data: data.to_vec(),
                });
            }
            "description" => fields.description = Some(field.text().await.map_err(multipart_error)?),
            "category" => fields.category = Some(field.text().await.map_err(multipart_error)?),
            "tags" => fields.tags = Some(field.text().await.map_err(multipart_error)?),
            "extractedDates" => {
                fields.extracted_dates = Some(field.text().await.map_err(multipart_error)?)
            }
            _ => {} // ignore unknown fields
        }
    }

    let file = file
        .filter(|f| !f.original_name.is_empty())
        .ok_or_else(|| AppError::BadRequest(MSG_NO_FILE.to_string()))?;

    documents::validate_file_type(&file.original_name, &file.mimetype)
        .map_err(|_| AppError::BadRequest(documents::MSG_INVALID_FILE_TYPE.to_string()))?;

    if file.data.len() > state.config.upload_max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File exceeds the maximum upload size of {} bytes",
            state.config.upload_max_bytes
        )));
    }

    let input = NewDocument {
        filename: documents::new_storage_filename(&file.original_name),
        original_name: file.original_name,
        description: fields.description.unwrap_or_default(),
        category: documents::parse_category(fields.category.as_deref())?,
        tags: fields.tags.as_deref().map(documents::parse_tags).unwrap_or_default(),
        size: file.data.len() as i64,
        mimetype: file.mimetype,
        extracted_dates: documents::parse_extracted_dates(
            fields.extracted_dates.as_deref().unwrap_or_default(),
        )?,
    };

    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    let path = state.config.upload_dir.join(&input.filename);
    tokio::fs::write(&path, &file.data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let document = match DocumentRepo::create(&state.pool, &input).await {
        Ok(document) => document,
        Err(e) => {
            remove_stored_file(&path).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        document_id = %document.id,
        filename = %document.filename,
        size = document.size,
        "Document uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(DocumentResponse {
            message: "Document uploaded successfully",
            document,
        }),
    ))
}

/// PUT /api/documents/{id}
///
/// Update description, category, tags, or extracted dates.
pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<DocumentPayload>,
) -> AppResult<impl IntoResponse> {
    let id = object_id::parse(&id)?;
    let patch = documents::prepare_patch(payload)?;
    let document = DocumentRepo::update(&state.pool, &id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(document_id = %document.id, "Document updated");

    Ok(Json(DocumentResponse {
        message: "Document updated successfully",
        document,
    }))
}

/// DELETE /api/documents/{id}
///
/// Reminders and events that reference the document keep the reference;
/// it resolves to `null` from then on.
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = object_id::parse(&id)?;
    let document = DocumentRepo::delete(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(id))?;

    remove_stored_file(&state.config.upload_dir.join(&document.filename)).await;

    tracing::info!(document_id = %document.id, "Document deleted");

    Ok(Json(MessageResponse {
        message: "Document deleted successfully",
    }))
}

async fn remove_stored_file(path: &std::path::Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove stored file");
    }
}
