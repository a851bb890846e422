//! Multi-label topic classification against a closed taxonomy.

use precinct_models::{ModelError, TopicModel};

/// The closed set of report topics.
pub const TOPIC_LABELS: [&str; 7] = [
    "bravery",
    "community service",
    "investigation",
    "rescue",
    "discipline",
    "training",
    "traffic management",
];

/// Minimum classifier confidence for a topic to be retained. Exclusive:
/// a score of exactly 0.30 is dropped.
pub const TOPIC_CONFIDENCE_THRESHOLD: f32 = 0.30;

/// Topics whose confidence strictly exceeds the threshold, in the order
/// the classifier returned them. Labels outside [`TOPIC_LABELS`] are
/// dropped regardless of score. An empty result means no topic reached
/// the threshold.
///
/// # Errors
///
/// Propagates classifier failures.
pub fn classify(model: &dyn TopicModel, text: &str) -> Result<Vec<String>, ModelError> {
    let ranked = model.rank(text, &TOPIC_LABELS)?;
    Ok(ranked
        .into_iter()
        .filter(|scored| scored.score > TOPIC_CONFIDENCE_THRESHOLD)
        .filter(|scored| {
            let known = TOPIC_LABELS.contains(&scored.label.as_str());
            if !known {
                tracing::warn!(label = %scored.label, "dropping topic outside the taxonomy");
            }
            known
        })
        .map(|scored| scored.label)
        .collect())
}
