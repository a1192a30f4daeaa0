use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error taxonomy.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Callers must be able to tell "zero qualifying institutions" (a 200 with an
/// empty list) apart from a pipeline failure, so no variant here is ever
/// downgraded to an empty success response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    /// Database unreachable or query failed. Retryable by the caller.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// The model's output could not be parsed into the expected schema.
    #[error("Malformed analysis: {0}")]
    MalformedAnalysis(String),

    /// The semantic-analysis round trip exceeded its budget, retries included.
    #[error("Analysis timed out after {0}s")]
    AnalysisTimeout(u64),

    /// LLM transport or API failure other than timeout/parse.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Gotenberg rejected or failed the document conversion.
    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Missing or invalid internal secret".to_string(),
            ),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::DataUnavailable(msg) => {
                tracing::error!("Database unavailable: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "DATA_UNAVAILABLE",
                    "The institution database could not be reached".to_string(),
                )
            }
            AppError::MalformedAnalysis(msg) => {
                tracing::error!("Malformed analysis: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_ANALYSIS",
                    "The analysis service returned an unusable result".to_string(),
                )
            }
            AppError::AnalysisTimeout(secs) => {
                tracing::error!("Analysis timed out after {secs}s");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "ANALYSIS_TIMEOUT",
                    "The analysis service did not respond in time".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::ConversionFailed(msg) => {
                tracing::error!("Conversion failed: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "CONVERSION_FAILED",
                    "The document conversion service failed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("too short".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_data_unavailable_maps_to_502() {
        let response = AppError::DataUnavailable("pool timeout".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_analysis_timeout_maps_to_504() {
        let response = AppError::AnalysisTimeout(20).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_malformed_analysis_maps_to_502() {
        let response = AppError::MalformedAnalysis("bad json".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
