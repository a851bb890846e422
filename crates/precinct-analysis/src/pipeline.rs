//! Pipeline orchestration: extract, fan out, aggregate.

use std::sync::Arc;

use precinct_extract::RawDocument;
use precinct_models::ModelRegistry;

use crate::entities;
use crate::error::AnalysisError;
use crate::report::{self, AnalysisOutcome};
use crate::sentiment;
use crate::topics;

/// Runs the analysis pipeline over one document per call.
///
/// The registry is read-only after construction, so a single `Analyzer`
/// serves concurrent callers; documents and extracted text stay
/// request-local.
#[derive(Clone, Debug)]
pub struct Analyzer {
    models: Arc<ModelRegistry>,
}

impl Analyzer {
    #[must_use]
    pub fn new(models: Arc<ModelRegistry>) -> Self {
        Self { models }
    }

    /// Analyze a raw document.
    ///
    /// Extraction failures are recovered: a document that cannot be read
    /// is reported as [`AnalysisOutcome::NoText`], not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a model invocation or a blocking task fails.
    pub async fn analyze(&self, doc: RawDocument) -> Result<AnalysisOutcome, AnalysisError> {
        let extracted = run_blocking(move || Ok(precinct_extract::extract(doc))).await?;
        let text = match extracted {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("text extraction failed: {e}");
                return Ok(AnalysisOutcome::NoText);
            }
        };
        self.analyze_text(&text).await
    }

    /// Analyze pre-extracted text.
    ///
    /// Empty or whitespace-only text short-circuits to
    /// [`AnalysisOutcome::NoText`] without invoking any model.
    ///
    /// # Errors
    ///
    /// Returns an error if a model invocation or a blocking task fails.
    pub async fn analyze_text(&self, text: &str) -> Result<AnalysisOutcome, AnalysisError> {
        let text = text.trim();
        if text.is_empty() {
            tracing::info!("no text to analyze");
            return Ok(AnalysisOutcome::NoText);
        }

        let shared: Arc<str> = Arc::from(text);

        let entity_model = self.models.entities();
        let sentiment_model = self.models.sentiment();
        let topic_model = self.models.topics();

        let entity_text = Arc::clone(&shared);
        let sentiment_text = Arc::clone(&shared);
        let topic_text = shared;

        // The three stages are mutually independent given the extracted
        // text; the join point waits for all of them.
        let (entity_sets, sentiment_score, topic_list) = tokio::try_join!(
            run_blocking(move || {
                let spans = entity_model.recognize(&entity_text)?;
                Ok(entities::classify_spans(&spans))
            }),
            run_blocking(move || Ok(sentiment::score(sentiment_model.as_ref(), &sentiment_text)?)),
            run_blocking(move || Ok(topics::classify(topic_model.as_ref(), &topic_text)?)),
        )?;

        Ok(AnalysisOutcome::Report(report::aggregate(
            entity_sets,
            sentiment_score,
            topic_list,
        )))
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, AnalysisError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AnalysisError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AnalysisError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use precinct_extract::DocumentKind;
    use precinct_models::EntityLabel;
    use precinct_models::mock::{self, MockEntities, MockSentiment, MockTopics};

    fn analyzer(
        sentiment: MockSentiment,
        topic: MockTopics,
        entity: MockEntities,
    ) -> Analyzer {
        Analyzer::new(Arc::new(mock::registry(sentiment, topic, entity)))
    }

    fn scenario_mocks() -> (MockSentiment, MockTopics, MockEntities) {
        (
            MockSentiment::with_prediction("POSITIVE", 0.987),
            MockTopics::with_scores(&[("rescue", 0.91), ("bravery", 0.42), ("training", 0.08)]),
            MockEntities::with_spans(&[
                ("John Smith", EntityLabel::Person),
                ("Central Police Station", EntityLabel::Other),
            ]),
        )
    }

    #[tokio::test]
    async fn empty_text_short_circuits_without_model_calls() {
        let (sentiment, topic, entity) = scenario_mocks();
        let a = analyzer(sentiment.clone(), topic.clone(), entity.clone());

        let outcome = a.analyze_text("").await.unwrap();
        assert!(outcome.is_no_text());
        assert_eq!(sentiment.call_count(), 0);
        assert_eq!(topic.call_count(), 0);
        assert_eq!(entity.call_count(), 0);
    }

    #[tokio::test]
    async fn whitespace_only_text_short_circuits() {
        let (sentiment, topic, entity) = scenario_mocks();
        let a = analyzer(sentiment.clone(), topic.clone(), entity.clone());

        let outcome = a.analyze_text(" \n\t  ").await.unwrap();
        assert!(outcome.is_no_text());
        assert_eq!(sentiment.call_count(), 0);
    }

    #[tokio::test]
    async fn rescue_scenario_produces_the_expected_report() {
        let (sentiment, topic, entity) = scenario_mocks();
        let a = analyzer(sentiment, topic, entity);

        let outcome = a
            .analyze_text("Officer John Smith at Central Police Station helped rescue a child.")
            .await
            .unwrap();
        let report = outcome.into_report().unwrap();

        assert!(report.officers.contains("John Smith"));
        assert!(report.departments.contains("Central Police Station"));
        assert_eq!(report.sentiment_label, "POSITIVE");
        assert!((report.sentiment_score - 0.987).abs() < 1e-9);
        assert_eq!(report.topics, vec!["rescue", "bravery"]);
    }

    #[tokio::test]
    async fn each_stage_runs_exactly_once() {
        let (sentiment, topic, entity) = scenario_mocks();
        let a = analyzer(sentiment.clone(), topic.clone(), entity.clone());

        a.analyze_text("some feedback").await.unwrap();
        assert_eq!(sentiment.call_count(), 1);
        assert_eq!(topic.call_count(), 1);
        assert_eq!(entity.call_count(), 1);
    }

    #[tokio::test]
    async fn inference_error_propagates_instead_of_defaulting() {
        let (_, topic, entity) = scenario_mocks();
        let a = analyzer(MockSentiment::failing(), topic, entity);

        let result = a.analyze_text("some feedback").await;
        assert!(matches!(result, Err(AnalysisError::Model(_))));
    }

    #[tokio::test]
    async fn entity_error_propagates_too() {
        let (sentiment, topic, _) = scenario_mocks();
        let a = analyzer(sentiment, topic, MockEntities::failing());

        assert!(a.analyze_text("some feedback").await.is_err());
    }

    #[tokio::test]
    async fn unreadable_document_recovers_to_no_text() {
        let (sentiment, topic, entity) = scenario_mocks();
        let a = analyzer(sentiment.clone(), topic, entity);

        let doc = RawDocument::new(vec![0xff, 0xfe], DocumentKind::PlainText);
        let outcome = a.analyze(doc).await.unwrap();
        assert!(outcome.is_no_text());
        assert_eq!(sentiment.call_count(), 0);
    }

    #[tokio::test]
    async fn plain_text_document_runs_end_to_end() {
        let (sentiment, topic, entity) = scenario_mocks();
        let a = analyzer(sentiment, topic, entity);

        let doc = RawDocument::new(b"  commendation for the patrol team  ".to_vec(), DocumentKind::PlainText);
        let outcome = a.analyze(doc).await.unwrap();
        assert!(!outcome.is_no_text());
    }

    #[tokio::test]
    async fn identical_text_yields_identical_reports() {
        let (sentiment, topic, entity) = scenario_mocks();
        let a = analyzer(sentiment, topic, entity);

        let text = "Officer John Smith at Central Police Station helped rescue a child.";
        let first = a.analyze_text(text).await.unwrap();
        let second = a.analyze_text(text).await.unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
