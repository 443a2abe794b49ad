use thiserror::Error;

/// Below this many characters a PDF is treated as not text-bearing
/// (scanned images, empty pages).
pub const MIN_EXTRACTED_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to extract text from PDF. Please ensure the file is a valid PDF.")]
    Unreadable(String),

    #[error(
        "Could not extract sufficient text from PDF ({chars} characters). \
         Please ensure the PDF contains readable text."
    )]
    InsufficientText { chars: usize },
}

/// Extracts the text layer of a PDF. CPU-bound; call from `spawn_blocking`.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;
    ensure_sufficient(text)
}

fn ensure_sufficient(text: String) -> Result<String, ExtractionError> {
    let text = text.trim().to_string();
    let chars = text.chars().count();
    if chars < MIN_EXTRACTED_CHARS {
        return Err(ExtractionError::InsufficientText { chars });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let err = extract_text(b"this is definitely not a pdf document").unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(_)));
    }

    #[test]
    fn test_short_text_is_insufficient() {
        let err = ensure_sufficient("  Page 1  \n".to_string()).unwrap_err();
        assert!(matches!(err, ExtractionError::InsufficientText { chars: 6 }));
    }

    #[test]
    fn test_sufficient_text_is_trimmed() {
        let body = "Jane Doe. Senior engineer with eight years of Rust and Go.";
        let text = ensure_sufficient(format!("\n\n{body}\n")).unwrap();
        assert_eq!(text, body);
    }
}
