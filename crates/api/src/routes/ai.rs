use axum::routing::post;
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// Assistant routes mounted at `/ai`. All answer 501 once input is valid.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(ai::chat))
        .route("/analyze/{id}", post(ai::analyze))
        .route("/summarize", post(ai::summarize))
}
