//! Axum route handler for PDF resume uploads.

use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
    Json,
};
use bytes::{Bytes, BytesMut};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::pdf::{extract_text, ExtractionError};

/// Multipart field carrying the file.
pub const UPLOAD_FIELD: &str = "resume";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
/// Cap on the PDF itself. The request body may exceed it by
/// `MULTIPART_OVERHEAD_BYTES` of boundaries and part headers.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
pub const MAX_REQUEST_BYTES: usize = MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES;

#[derive(Debug, Serialize)]
pub struct ExtractPdfResponse {
    pub text: String,
}

/// POST /api/extract-pdf
///
/// Accepts a multipart upload with a single PDF in the `resume` field and
/// returns its text.
pub async fn handle_extract_pdf(
    mut multipart: Multipart,
) -> Result<Json<ExtractPdfResponse>, AppError> {
    let mut upload: Option<Bytes> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if field.content_type() != Some(PDF_CONTENT_TYPE) {
            return Err(AppError::Validation("Only PDF files are allowed".to_string()));
        }
        let mut buffer = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if buffer.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(too_large());
            }
            buffer.extend_from_slice(&chunk);
        }
        upload = Some(buffer.freeze());
        break;
    }

    let bytes = upload.ok_or_else(|| AppError::Validation("No PDF file uploaded".to_string()))?;
    let size = bytes.len();

    // pdf-extract can panic on malformed input; a panicked task is an unreadable PDF.
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| {
            warn!("PDF extraction task failed: {e}");
            ExtractionError::Unreadable(e.to_string())
        })??;

    info!("Extracted {} characters from {size}-byte PDF", text.chars().count());
    Ok(Json(ExtractPdfResponse { text }))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        AppError::Validation(format!("Invalid multipart upload: {}", e.body_text()))
    }
}

fn too_large() -> AppError {
    AppError::PayloadTooLarge(format!(
        "PDF must be at most {} MB",
        MAX_UPLOAD_BYTES / (1024 * 1024)
    ))
}
