#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model loading failed: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("candle error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
