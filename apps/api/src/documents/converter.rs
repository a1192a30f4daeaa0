//! DOCX→PDF conversion proxied to a Gotenberg instance
//! (`POST /forms/libreoffice/convert`). Nothing is converted locally.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use tracing::{error, info};

use crate::errors::AppError;

const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub async fn convert_docx_to_pdf(
    client: &reqwest::Client,
    gotenberg_url: &str,
    docx_bytes: Bytes,
) -> Result<Bytes, AppError> {
    let url = format!("{gotenberg_url}/forms/libreoffice/convert");

    let part = Part::bytes(docx_bytes.to_vec())
        .file_name("document.docx")
        .mime_str(DOCX_MIME)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid mime type: {e}")))?;
    let form = Form::new().part("files", part);

    info!("requesting Gotenberg conversion at {url}");

    let response = client.post(&url).multipart(form).send().await.map_err(|e| {
        error!("Gotenberg unreachable: {e}");
        AppError::ConversionFailed(e.to_string())
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::ConversionFailed(format!(
            "Gotenberg returned {status}: {body}"
        )));
    }

    let pdf_bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::ConversionFailed(e.to_string()))?;

    if !is_pdf(&pdf_bytes) {
        return Err(AppError::ConversionFailed(
            "Gotenberg did not return a valid PDF".to_string(),
        ));
    }

    Ok(pdf_bytes)
}

/// A valid PDF starts with the `%PDF` magic bytes.
fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}
