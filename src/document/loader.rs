//! PDF text extraction.

use crate::core::errors::CoreError;

/// Extract plain text from an in-memory PDF.
///
/// A corrupt or encrypted file, or a file that yields no usable text,
/// surfaces as `DocumentLoad` rather than a silent empty string.
pub fn extract_text(bytes: &[u8]) -> Result<String, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::DocumentLoad("empty document body".to_string()));
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|err| CoreError::DocumentLoad(err.to_string()))?;

    if text.trim().is_empty() {
        return Err(CoreError::DocumentLoad(
            "no extractable text in document".to_string(),
        ));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_a_load_failure() {
        let err = extract_text(&[]).unwrap_err();
        assert!(matches!(err, CoreError::DocumentLoad(_)));
    }

    #[test]
    fn garbage_bytes_are_a_load_failure() {
        let err = extract_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, CoreError::DocumentLoad(_)));
    }
}
