use axum::routing::get;
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Document routes mounted at `/documents`.
///
/// ```text
/// GET    /        -> list_documents
/// POST   /        -> upload_document (multipart)
/// GET    /{id}    -> get_document
/// PUT    /{id}    -> update_document
/// DELETE /{id}    -> delete_document
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(documents::list_documents).post(documents::upload_document),
        )
        .route(
            "/{id}",
            get(documents::get_document)
                .put(documents::update_document)
                .delete(documents::delete_document),
        )
}
