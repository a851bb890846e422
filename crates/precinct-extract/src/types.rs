use serde::{Deserialize, Serialize};

/// Declared type of an uploaded document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Infer the kind from a file extension, case-insensitively.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" | "md" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// An uploaded document as received from the collaborator that owns the
/// upload surface. Consumed once by [`crate::extract`].
#[derive(Clone, Debug)]
pub struct RawDocument {
    pub bytes: Vec<u8>,
    pub kind: DocumentKind,
}

impl RawDocument {
    #[must_use]
    pub fn new(bytes: Vec<u8>, kind: DocumentKind) -> Self {
        Self { bytes, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_pdf_extension() {
        assert_eq!(DocumentKind::from_extension("pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension("PDF"), Some(DocumentKind::Pdf));
    }

    #[test]
    fn kind_from_text_extensions() {
        for ext in ["txt", "text", "md", "TXT"] {
            assert_eq!(
                DocumentKind::from_extension(ext),
                Some(DocumentKind::PlainText),
                "failed for: {ext}"
            );
        }
    }

    #[test]
    fn kind_from_unknown_extension() {
        assert_eq!(DocumentKind::from_extension("docx"), None);
        assert_eq!(DocumentKind::from_extension(""), None);
    }

    #[test]
    fn kind_serializes_as_kebab_case() {
        assert_eq!(
            serde_json::to_value(DocumentKind::Pdf).unwrap(),
            serde_json::json!("pdf")
        );
        assert_eq!(
            serde_json::to_value(DocumentKind::PlainText).unwrap(),
            serde_json::json!("plain-text")
        );
    }

    #[test]
    fn kind_roundtrips_through_serde() {
        let kind: DocumentKind = serde_json::from_str("\"plain-text\"").unwrap();
        assert_eq!(kind, DocumentKind::PlainText);
    }
}
