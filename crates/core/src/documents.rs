//! Document vocabulary and upload rules.
//!
//! Covers the category enum, the allowed upload types, the size limit,
//! storage filename assignment, tag parsing, and list filtering.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::labels::{define_label_enum, parse_optional};
use crate::reminders::filter_value;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

define_label_enum! {
    /// Document category.
    DocumentCategory ("category") {
        Contract = "contract",
        Legal = "legal",
        Administrative = "administrative",
        Court = "court",
        Other = "other",
    }
}

impl Default for DocumentCategory {
    fn default() -> Self {
        DocumentCategory::Other
    }
}

// ---------------------------------------------------------------------------
// Upload rules
// ---------------------------------------------------------------------------

/// Default maximum upload size in bytes (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const MSG_NO_FILE: &str = "No file uploaded";
pub const MSG_INVALID_FILE_TYPE: &str =
    "Invalid file type. Only PDF, DOC, DOCX, TXT, JPG, JPEG, and PNG files are allowed.";

/// Accepted extensions and the MIME types that may accompany each.
const ALLOWED_TYPES: &[(&str, &[&str])] = &[
    ("pdf", &["application/pdf"]),
    ("doc", &["application/msword"]),
    (
        "docx",
        &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"],
    ),
    ("txt", &["text/plain"]),
    ("jpg", &["image/jpeg", "image/jpg"]),
    ("jpeg", &["image/jpeg", "image/jpg"]),
    ("png", &["image/png"]),
];

/// Lowercased extension of `filename` without the dot, if any.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Check that both the extension and the MIME type are on the allow list
/// and agree with each other.
pub fn validate_file_type(original_name: &str, mimetype: &str) -> Result<(), CoreError> {
    let ext = extension_of(original_name).ok_or_else(|| CoreError::invalid(MSG_INVALID_FILE_TYPE))?;
    // Browsers sometimes append parameters, e.g. `text/plain; charset=utf-8`.
    let mime = mimetype
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let allowed = ALLOWED_TYPES
        .iter()
        .any(|(e, mimes)| *e == ext && mimes.contains(&mime.as_str()));

    if allowed {
        Ok(())
    } else {
        Err(CoreError::invalid(MSG_INVALID_FILE_TYPE))
    }
}

/// Storage filename for an upload: `<unix-millis>-<random><.ext>`.
///
/// The extension is taken from the client's filename; everything else the
/// client supplied is discarded.
pub fn storage_filename(original_name: &str, unix_millis: i64, suffix: u32) -> String {
    match extension_of(original_name) {
        Some(ext) if ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!("{unix_millis}-{suffix}.{ext}")
        }
        _ => format!("{unix_millis}-{suffix}"),
    }
}

/// Generate a storage filename for the current instant.
pub fn new_storage_filename(original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = rand::random_range(0..1_000_000_000u32);
    storage_filename(original_name, millis, suffix)
}

/// Parse the `tags` form field: a JSON array of strings, or a
/// comma-separated list. Blank entries are dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    let tags = serde_json::from_str::<Vec<String>>(raw)
        .unwrap_or_else(|_| raw.split(',').map(str::to_string).collect());
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Extracted dates
// ---------------------------------------------------------------------------

/// A free-form date annotation attached to a document.
///
/// Never validated against reminders; `date` is whatever text was extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDate {
    #[serde(default)]
    pub date: String,
    #[serde(rename = "type", default)]
    pub date_type: String,
    #[serde(default)]
    pub context: String,
}

/// Parse the `extractedDates` form field (a JSON array). Empty means none.
pub fn parse_extracted_dates(raw: &str) -> Result<Vec<ExtractedDate>, CoreError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|e| CoreError::invalid(format!("extractedDates must be a JSON array: {e}")))
}

// ---------------------------------------------------------------------------
// Create / update
// ---------------------------------------------------------------------------

/// Metadata for a stored upload, ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub filename: String,
    pub original_name: String,
    pub description: String,
    pub category: DocumentCategory,
    pub tags: Vec<String>,
    pub size: i64,
    pub mimetype: String,
    pub extracted_dates: Vec<ExtractedDate>,
}

/// Raw update fields for a document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub extracted_dates: Option<Vec<ExtractedDate>>,
}

/// A validated partial document update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    pub description: Option<String>,
    pub category: Option<DocumentCategory>,
    pub tags: Option<Vec<String>>,
    pub extracted_dates: Option<Vec<ExtractedDate>>,
}

/// Parse an optional category label, defaulting to [`DocumentCategory::Other`].
pub fn parse_category(raw: Option<&str>) -> Result<DocumentCategory, CoreError> {
    let mut errors = Vec::new();
    let category = parse_optional(raw.filter(|v| !v.is_empty()), &mut errors);
    if errors.is_empty() {
        Ok(category.unwrap_or_default())
    } else {
        Err(CoreError::Validation(errors))
    }
}

/// Validate an update payload.
pub fn prepare_patch(p: DocumentPayload) -> Result<DocumentPatch, CoreError> {
    let mut errors = Vec::new();
    let category = parse_optional(p.category.as_deref(), &mut errors);
    if !errors.is_empty() {
        return Err(CoreError::Validation(errors));
    }
    Ok(DocumentPatch {
        description: p.description,
        category,
        tags: p.tags,
        extracted_dates: p.extracted_dates,
    })
}

// ---------------------------------------------------------------------------
// List filter
// ---------------------------------------------------------------------------

/// Filter for listing documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    pub category: Option<DocumentCategory>,
    /// Exact tag the document must carry.
    pub tag: Option<String>,
    /// Case-insensitive substring of the original name or description.
    pub search: Option<String>,
}

impl DocumentFilter {
    pub fn parse(
        category: Option<&str>,
        tag: Option<&str>,
        search: Option<&str>,
    ) -> Result<Self, CoreError> {
        let mut errors = Vec::new();
        let category = parse_optional(filter_value(category), &mut errors);
        if !errors.is_empty() {
            return Err(CoreError::Validation(errors));
        }
        Ok(DocumentFilter {
            category,
            tag: tag.filter(|t| !t.is_empty()).map(str::to_string),
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

/// Escape `%`, `_`, and `\` so `term` matches literally inside a LIKE pattern.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
