use candle_core::Device;

use super::distilbert::SequenceClassifier;
use super::softmax;
use crate::error::ModelError;
use crate::provider::{ScoredLabel, TopicModel};

/// NLI-based zero-shot classifier.
///
/// Each candidate label becomes the hypothesis of an entailment query
/// against the input text; entailment logits are softmaxed across
/// candidates so the scores are comparable.
#[derive(Debug)]
pub struct ZeroShotClassifier {
    inner: SequenceClassifier,
    entailment_idx: usize,
}

fn hypothesis(label: &str) -> String {
    format!("This example is {label}.")
}

impl ZeroShotClassifier {
    /// Load a DistilBERT MNLI checkpoint from `HuggingFace` Hub.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the checkpoint's label
    /// vocabulary has no entailment class.
    pub fn load(repo_id: &str, device: &Device) -> Result<Self, ModelError> {
        let inner = SequenceClassifier::load(repo_id, device)?;
        let entailment_idx = inner
            .labels()
            .iter()
            .position(|l| l.eq_ignore_ascii_case("entailment"))
            .ok_or_else(|| {
                ModelError::ModelLoad(format!("{repo_id} has no entailment label"))
            })?;
        tracing::info!(repo = repo_id, "zero-shot model loaded");
        Ok(Self {
            inner,
            entailment_idx,
        })
    }
}

impl TopicModel for ZeroShotClassifier {
    fn rank(&self, text: &str, candidates: &[&str]) -> Result<Vec<ScoredLabel>, ModelError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut entailment = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let premise_hypothesis = (text, hypothesis(candidate));
            let logits = self.inner.logits(premise_hypothesis)?;
            let logit = logits.get(self.entailment_idx).copied().ok_or_else(|| {
                ModelError::Inference(format!(
                    "entailment index {} out of range",
                    self.entailment_idx
                ))
            })?;
            entailment.push(logit);
        }

        let scores = softmax(&entailment);
        let mut ranked: Vec<ScoredLabel> = candidates
            .iter()
            .zip(scores)
            .map(|(label, score)| ScoredLabel {
                label: (*label).to_owned(),
                score,
            })
            .collect();
        // Stable sort: candidate order breaks ties.
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hypothesis_embeds_the_label() {
        assert_eq!(hypothesis("rescue"), "This example is rescue.");
        assert_eq!(
            hypothesis("traffic management"),
            "This example is traffic management."
        );
    }
}
