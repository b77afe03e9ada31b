//! Assistant endpoints.
//!
//! No assistant backend is wired up. Each endpoint validates its input the
//! way a real implementation would and then answers 501.

use axum::extract::Path;
use docket_core::error::CoreError;
use docket_core::object_id;
use serde::Deserialize;

use crate::error::{AppError, AppResult, ValidatedJson};

const UNAVAILABLE: &str = "AI assistant is not available";

/// Body of `POST /api/ai/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    /// Ids of documents the question refers to.
    #[serde(default)]
    pub context: Vec<String>,
}

/// Body of `POST /api/ai/summarize`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    #[serde(default)]
    pub document_ids: Vec<String>,
}

fn check_ids(ids: &[String]) -> Result<(), CoreError> {
    ids.iter().try_for_each(|id| object_id::parse(id).map(|_| ()))
}

/// POST /api/ai/chat
pub async fn chat(ValidatedJson(body): ValidatedJson<ChatRequest>) -> AppResult<()> {
    if body.message.as_deref().map_or(true, |m| m.trim().is_empty()) {
        return Err(CoreError::invalid("Message is required").into());
    }
    check_ids(&body.context)?;
    Err(AppError::NotImplemented(UNAVAILABLE.to_string()))
}

/// POST /api/ai/analyze/{id}
pub async fn analyze(Path(id): Path<String>) -> AppResult<()> {
    object_id::parse(&id)?;
    Err(AppError::NotImplemented(UNAVAILABLE.to_string()))
}

/// POST /api/ai/summarize
pub async fn summarize(
    ValidatedJson(body): ValidatedJson<SummarizeRequest>,
) -> AppResult<()> {
    if body.document_ids.is_empty() {
        return Err(CoreError::invalid("At least one document ID is required").into());
    }
    check_ids(&body.document_ids)?;
    Err(AppError::NotImplemented(UNAVAILABLE.to_string()))
}
