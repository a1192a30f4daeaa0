//! PDF text extraction via the `pdf-extract` crate.

use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Uploads above this size are rejected before extraction.
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

/// Extracts text from in-memory PDF bytes. Extraction is CPU-bound, so it
/// runs on the blocking pool.
pub async fn extract_text(pdf_bytes: Bytes) -> Result<String, AppError> {
    if pdf_bytes.len() > MAX_PDF_BYTES {
        return Err(AppError::Validation(format!(
            "PDF exceeds the {}MB limit",
            MAX_PDF_BYTES / (1024 * 1024)
        )));
    }

    let raw = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf_bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task panicked: {e}")))?
        .map_err(|e| AppError::UnprocessableEntity(format!("PDF extraction failed: {e}")))?;

    let text = normalize_extracted(&raw)?;
    debug!("extracted {} chars from PDF", text.chars().count());
    Ok(text)
}

/// Collapses extraction artifacts and rejects effectively-empty documents
/// (scanned image PDFs with no text layer come back blank).
fn normalize_extracted(raw: &str) -> Result<String, AppError> {
    let text: String = raw
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "PDF contains no extractable text".to_string(),
        ));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_trailing_whitespace_per_line() {
        let raw = "첫 줄   \n둘째 줄\t\n";
        assert_eq!(normalize_extracted(raw).unwrap(), "첫 줄\n둘째 줄");
    }

    #[test]
    fn test_normalize_rejects_empty_text() {
        assert!(matches!(
            normalize_extracted("   \n \t \n"),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[tokio::test]
    async fn test_oversized_pdf_rejected_before_extraction() {
        let oversized = Bytes::from(vec![0u8; MAX_PDF_BYTES + 1]);
        assert!(matches!(
            extract_text(oversized).await,
            Err(AppError::Validation(_))
        ));
    }
}
