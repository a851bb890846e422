use candle_core::Device;

use super::argmax;
use super::distilbert::SequenceClassifier;
use crate::error::ModelError;
use crate::provider::{SentimentModel, SentimentPrediction};

/// SST-2 style polarity classifier.
#[derive(Debug)]
pub struct SentimentClassifier {
    inner: SequenceClassifier,
}

impl SentimentClassifier {
    /// Load a DistilBERT sequence-classification checkpoint from
    /// `HuggingFace` Hub.
    ///
    /// # Errors
    ///
    /// Returns an error if download, weight loading, or tokenizer
    /// initialization fails.
    pub fn load(repo_id: &str, device: &Device) -> Result<Self, ModelError> {
        let inner = SequenceClassifier::load(repo_id, device)?;
        tracing::info!(
            repo = repo_id,
            labels = inner.labels().len(),
            "sentiment model loaded"
        );
        Ok(Self { inner })
    }
}

impl SentimentModel for SentimentClassifier {
    fn predict(&self, text: &str) -> Result<SentimentPrediction, ModelError> {
        let probs = self.inner.probabilities(text)?;
        let (idx, confidence) = argmax(&probs)
            .ok_or_else(|| ModelError::Inference("classifier produced no logits".into()))?;
        let label = self
            .inner
            .labels()
            .get(idx)
            .cloned()
            .ok_or_else(|| ModelError::Inference(format!("label index {idx} out of range")))?;
        Ok(SentimentPrediction { label, confidence })
    }
}
