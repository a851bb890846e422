//! The canonical analysis report.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::entities::EntitySets;
use crate::sentiment::SentimentScore;

/// The sole externally visible output of an analysis run. Immutable once
/// constructed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub officers: BTreeSet<String>,
    pub departments: BTreeSet<String>,
    pub sentiment_score: f64,
    pub sentiment_label: String,
    pub topics: Vec<String>,
}

/// Assemble the canonical report. Pure combination: every field is
/// populated explicitly from exactly one upstream stage.
#[must_use]
pub fn aggregate(
    entities: EntitySets,
    sentiment: SentimentScore,
    topics: Vec<String>,
) -> AnalysisReport {
    AnalysisReport {
        officers: entities.officers,
        departments: entities.departments,
        sentiment_score: sentiment.score,
        sentiment_label: sentiment.label.as_str().to_owned(),
        topics,
    }
}

/// Outcome of one pipeline run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum AnalysisOutcome {
    /// The document yielded no usable text; no classifier ran.
    NoText,
    /// Full analysis of a non-empty document.
    Report(AnalysisReport),
}

impl AnalysisOutcome {
    #[must_use]
    pub fn is_no_text(&self) -> bool {
        matches!(self, Self::NoText)
    }

    #[must_use]
    pub fn into_report(self) -> Option<AnalysisReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::NoText => None,
        }
    }
}
