use axum::{extract::State, http::HeaderMap, Json};

use crate::auth::require_internal_secret;
use crate::errors::AppError;
use crate::recommendation::models::{RecommendationRequestDto, RecommendationResponse};
use crate::recommendation::service::recommend;
use crate::state::AppState;

/// POST /api/v1/recommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RecommendationRequestDto>,
) -> Result<Json<RecommendationResponse>, AppError> {
    require_internal_secret(&headers, &state.config)?;

    let response = recommend(
        state.analyzer.as_ref(),
        state.institutions.as_ref(),
        &state.config,
        &req.counsel_request_text,
    )
    .await?;

    Ok(Json(response))
}
