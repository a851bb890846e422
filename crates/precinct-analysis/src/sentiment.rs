//! Signed sentiment scoring over a bounded text prefix.

use precinct_models::{ModelError, SentimentModel};
use serde::Serialize;

/// Characters of input submitted to the classifier. Text beyond this bound
/// never influences the score; it is truncated, not summarized.
pub const SENTIMENT_PREFIX_CHARS: usize = 512;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
        }
    }
}

/// Signed polarity: positive label gives a score in `[0, 1]`, negative in
/// `[-1, 0]`; magnitude is the classifier confidence, rounded to 3
/// decimals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SentimentScore {
    pub label: SentimentLabel,
    pub score: f64,
}

/// Score the polarity of `text` from its first [`SENTIMENT_PREFIX_CHARS`]
/// characters. The classifier's single best prediction is authoritative;
/// there is no retry on low confidence.
///
/// # Errors
///
/// Propagates classifier failures.
pub fn score(model: &dyn SentimentModel, text: &str) -> Result<SentimentScore, ModelError> {
    let prediction = model.predict(prefix(text))?;
    let label = if prediction.label.eq_ignore_ascii_case("positive") {
        SentimentLabel::Positive
    } else {
        SentimentLabel::Negative
    };
    let magnitude = f64::from(prediction.confidence);
    let signed = match label {
        SentimentLabel::Positive => magnitude,
        SentimentLabel::Negative => -magnitude,
    };
    Ok(SentimentScore {
        label,
        score: round3(signed),
    })
}

fn prefix(text: &str) -> &str {
    match text.char_indices().nth(SENTIMENT_PREFIX_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
