//! Model providers for the feedback analysis pipeline.
//!
//! Three capability traits ([`SentimentModel`], [`TopicModel`],
//! [`EntityModel`]) with candle-transformers implementations, gathered
//! behind a process-wide [`ModelRegistry`].

pub mod candle;
pub mod error;
#[cfg(feature = "mock")]
pub mod mock;
pub mod provider;
pub mod registry;

pub use error::ModelError;
pub use provider::{
    EntityLabel, EntityModel, EntitySpan, ScoredLabel, SentimentModel, SentimentPrediction,
    TopicModel,
};
pub use registry::{ModelConfig, ModelRegistry};
