use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use crate::auth::require_internal_secret;
use crate::documents::converter::convert_docx_to_pdf;
use crate::documents::extractor::extract_text;
use crate::documents::models::{DocumentSummary, ExtractResponse, SummarizeRequest};
use crate::documents::summarizer::summarize;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/documents/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    require_internal_secret(&headers, &state.config)?;

    let pdf_bytes = read_upload(multipart, ".pdf").await?;
    let text = extract_text(pdf_bytes).await?;
    let char_count = text.chars().count();

    Ok(Json(ExtractResponse { text, char_count }))
}

/// POST /api/v1/documents/summarize
pub async fn handle_summarize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<DocumentSummary>, AppError> {
    require_internal_secret(&headers, &state.config)?;

    if req.text_content.trim().chars().count() < 10 {
        return Err(AppError::Validation(
            "text_content must be at least 10 characters".to_string(),
        ));
    }

    let summary = summarize(&state.llm, &req).await?;
    Ok(Json(summary))
}

/// POST /api/v1/documents/convert
pub async fn handle_convert(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, AppError> {
    require_internal_secret(&headers, &state.config)?;

    let docx_bytes = read_upload(multipart, ".docx").await?;
    let pdf_bytes = convert_docx_to_pdf(&state.http, &state.config.gotenberg_url, docx_bytes).await?;

    Ok(([(header::CONTENT_TYPE, "application/pdf")], pdf_bytes).into_response())
}

/// Pulls the first `file` field out of a multipart upload and checks its
/// extension. Everything wrong with the upload itself is a 400.
async fn read_upload(mut multipart: Multipart, expected_ext: &str) -> Result<Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_lowercase();
        if !file_name.ends_with(expected_ext) {
            return Err(AppError::Validation(format!(
                "only {expected_ext} uploads are accepted"
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;

        if bytes.is_empty() {
            return Err(AppError::Validation("uploaded file is empty".to_string()));
        }

        return Ok(bytes);
    }

    Err(AppError::Validation(
        "multipart field 'file' is required".to_string(),
    ))
}
