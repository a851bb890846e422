//! Process-wide registry of the three capability providers.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::candle::{NerTagger, SentimentClassifier, ZeroShotClassifier, select_device};
use crate::error::ModelError;
use crate::provider::{EntityModel, SentimentModel, TopicModel};

/// Checkpoint and device selection for [`ModelRegistry::load`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub sentiment_repo: String,
    pub zero_shot_repo: String,
    pub ner_repo: String,
    /// `cpu`, `cuda`, or `auto`.
    pub device: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            sentiment_repo: "distilbert-base-uncased-finetuned-sst-2-english".into(),
            zero_shot_repo: "typeform/distilbert-base-uncased-mnli".into(),
            ner_repo: "dslim/bert-base-NER".into(),
            device: "cpu".into(),
        }
    }
}

/// The three capability providers, loaded once and shared read-only across
/// all analysis requests.
#[derive(Clone)]
pub struct ModelRegistry {
    sentiment: Arc<dyn SentimentModel>,
    topics: Arc<dyn TopicModel>,
    entities: Arc<dyn EntityModel>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry").finish_non_exhaustive()
    }
}

static GLOBAL: OnceCell<Arc<ModelRegistry>> = OnceCell::const_new();

impl ModelRegistry {
    /// Construct a registry from explicit providers. This is the injection
    /// seam for tests and embedders.
    #[must_use]
    pub fn with_providers(
        sentiment: Arc<dyn SentimentModel>,
        topics: Arc<dyn TopicModel>,
        entities: Arc<dyn EntityModel>,
    ) -> Self {
        Self {
            sentiment,
            topics,
            entities,
        }
    }

    /// Load the three candle providers. Slow on first run: weights are
    /// downloaded into the hf-hub cache.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ModelLoad`] if any provider fails to
    /// initialize; no analysis can proceed in that case.
    pub fn load(config: &ModelConfig) -> Result<Self, ModelError> {
        let device = select_device(&config.device)?;
        let sentiment = SentimentClassifier::load(&config.sentiment_repo, &device)?;
        let topics = ZeroShotClassifier::load(&config.zero_shot_repo, &device)?;
        let entities = NerTagger::load(&config.ner_repo, &device)?;
        tracing::info!("model registry initialized");
        Ok(Self::with_providers(
            Arc::new(sentiment),
            Arc::new(topics),
            Arc::new(entities),
        ))
    }

    /// Process-wide registry, loaded at most once even under concurrent
    /// first access. The configuration of the winning caller is the one
    /// that sticks; later configurations are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ModelLoad`] if initialization fails. A failed
    /// initialization leaves the cell empty, so a later call retries.
    pub async fn global(config: &ModelConfig) -> Result<Arc<Self>, ModelError> {
        let config = config.clone();
        GLOBAL
            .get_or_try_init(|| async move {
                let loaded = tokio::task::spawn_blocking(move || Self::load(&config))
                    .await
                    .map_err(|e| ModelError::ModelLoad(format!("model load task failed: {e}")))??;
                Ok(Arc::new(loaded))
            })
            .await
            .cloned()
    }

    #[must_use]
    pub fn sentiment(&self) -> Arc<dyn SentimentModel> {
        Arc::clone(&self.sentiment)
    }

    #[must_use]
    pub fn topics(&self) -> Arc<dyn TopicModel> {
        Arc::clone(&self.topics)
    }

    #[must_use]
    pub fn entities(&self) -> Arc<dyn EntityModel> {
        Arc::clone(&self.entities)
    }
}
