//! Test-only mock model providers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::ModelError;
use crate::provider::{
    EntityLabel, EntityModel, EntitySpan, ScoredLabel, SentimentModel, SentimentPrediction,
    TopicModel,
};
use crate::registry::ModelRegistry;

#[derive(Clone, Debug)]
pub struct MockSentiment {
    pub prediction: SentimentPrediction,
    pub fail: bool,
    calls: Arc<AtomicUsize>,
    last_input: Arc<Mutex<Option<String>>>,
}

impl Default for MockSentiment {
    fn default() -> Self {
        Self {
            prediction: SentimentPrediction {
                label: "POSITIVE".into(),
                confidence: 0.9,
            },
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
            last_input: Arc::new(Mutex::new(None)),
        }
    }
}

impl MockSentiment {
    #[must_use]
    pub fn with_prediction(label: &str, confidence: f32) -> Self {
        Self {
            prediction: SentimentPrediction {
                label: label.to_owned(),
                confidence,
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Text submitted on the most recent call.
    #[must_use]
    pub fn last_input(&self) -> Option<String> {
        self.last_input.lock().unwrap().clone()
    }
}

impl SentimentModel for MockSentiment {
    fn predict(&self, text: &str) -> Result<SentimentPrediction, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some(text.to_owned());
        if self.fail {
            return Err(ModelError::Inference("mock sentiment error".into()));
        }
        Ok(self.prediction.clone())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MockTopics {
    pub scored: Vec<ScoredLabel>,
    pub fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockTopics {
    /// Canned ranking returned by every call, in the given order.
    #[must_use]
    pub fn with_scores(scores: &[(&str, f32)]) -> Self {
        Self {
            scored: scores
                .iter()
                .map(|(label, score)| ScoredLabel {
                    label: (*label).to_owned(),
                    score: *score,
                })
                .collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TopicModel for MockTopics {
    fn rank(&self, _text: &str, _candidates: &[&str]) -> Result<Vec<ScoredLabel>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ModelError::Inference("mock topic error".into()));
        }
        Ok(self.scored.clone())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MockEntities {
    pub spans: Vec<EntitySpan>,
    pub fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockEntities {
    /// Canned spans returned by every call, in the given order.
    #[must_use]
    pub fn with_spans(spans: &[(&str, EntityLabel)]) -> Self {
        Self {
            spans: spans
                .iter()
                .map(|(text, label)| EntitySpan {
                    text: (*text).to_owned(),
                    label: *label,
                })
                .collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EntityModel for MockEntities {
    fn recognize(&self, _text: &str) -> Result<Vec<EntitySpan>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ModelError::Inference("mock entity error".into()));
        }
        Ok(self.spans.clone())
    }
}

/// Registry wired to the given mocks.
#[must_use]
pub fn registry(
    sentiment: MockSentiment,
    topics: MockTopics,
    entities: MockEntities,
) -> ModelRegistry {
    ModelRegistry::with_providers(Arc::new(sentiment), Arc::new(topics), Arc::new(entities))
}
