use crate::error::ExtractError;
use crate::types::{DocumentKind, RawDocument};

/// Extract the normalized text content of a document.
///
/// PDF page texts are concatenated in page order; plain-text bytes are
/// decoded as strict UTF-8. The result is trimmed of leading and trailing
/// whitespace. An empty result is valid and means the document contains
/// nothing to analyze.
///
/// # Errors
///
/// Returns [`ExtractError::Pdf`] for a malformed or unreadable PDF stream
/// and [`ExtractError::Utf8`] when plain-text bytes are not valid UTF-8.
pub fn extract(doc: RawDocument) -> Result<String, ExtractError> {
    let text = match doc.kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(&doc.bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string()))?,
        DocumentKind::PlainText => String::from_utf8(doc.bytes)?,
    };
    let trimmed = text.trim();
    tracing::debug!(chars = trimmed.chars().count(), "document text extracted");
    Ok(trimmed.to_owned())
}
