#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("invalid UTF-8 in plain-text document: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
