#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("model inference failed: {0}")]
    Model(#[from] precinct_models::ModelError),

    #[error("analysis task failed: {0}")]
    Task(String),
}
