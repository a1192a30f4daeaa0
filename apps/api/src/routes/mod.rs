pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::documents;
use crate::documents::extractor::MAX_PDF_BYTES;
use crate::recommendation;
use crate::state::AppState;

/// Framework body cap: the extractor's PDF limit plus headroom for multipart
/// framing, so an at-limit upload reaches the handler's own size check and
/// gets the JSON error envelope instead of a bare 413.
const BODY_LIMIT_BYTES: usize = MAX_PDF_BYTES + 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Recommendation API
        .route(
            "/api/v1/recommendations",
            post(recommendation::handlers::handle_recommendations),
        )
        // Document-processing API
        .route(
            "/api/v1/documents/extract",
            post(documents::handlers::handle_extract),
        )
        .route(
            "/api/v1/documents/summarize",
            post(documents::handlers::handle_summarize),
        )
        .route(
            "/api/v1/documents/convert",
            post(documents::handlers::handle_convert),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}
