//! End-to-end pipeline tests over mock model providers.

use std::sync::Arc;

use precinct_analysis::Analyzer;
use precinct_extract::{DocumentKind, RawDocument};
use precinct_models::EntityLabel;
use precinct_models::mock::{self, MockEntities, MockSentiment, MockTopics};

fn scenario_analyzer() -> (Analyzer, MockSentiment, MockTopics, MockEntities) {
    let sentiment = MockSentiment::with_prediction("POSITIVE", 0.987);
    let topics = MockTopics::with_scores(&[
        ("rescue", 0.91),
        ("bravery", 0.42),
        ("investigation", 0.30),
        ("training", 0.05),
    ]);
    let entities = MockEntities::with_spans(&[
        ("John Smith", EntityLabel::Person),
        ("Central Police Station", EntityLabel::Other),
        ("Springfield", EntityLabel::Other),
    ]);
    let analyzer = Analyzer::new(Arc::new(mock::registry(
        sentiment.clone(),
        topics.clone(),
        entities.clone(),
    )));
    (analyzer, sentiment, topics, entities)
}

#[tokio::test]
async fn full_report_from_a_plain_text_document() {
    let (analyzer, _, _, _) = scenario_analyzer();
    let doc = RawDocument::new(
        b"Officer John Smith at Central Police Station helped rescue a child.".to_vec(),
        DocumentKind::PlainText,
    );

    let report = analyzer.analyze(doc).await.unwrap().into_report().unwrap();

    assert!(report.officers.contains("John Smith"));
    assert!(report.departments.contains("Central Police Station"));
    // "Springfield" matches neither rule and is discarded.
    assert_eq!(report.officers.len(), 1);
    assert_eq!(report.departments.len(), 1);
    assert_eq!(report.sentiment_label, "POSITIVE");
    assert!((report.sentiment_score - 0.987).abs() < 1e-9);
    // 0.42 passes the 0.30 threshold, 0.30 itself does not.
    assert_eq!(report.topics, vec!["rescue", "bravery"]);
}

#[tokio::test]
async fn report_json_matches_the_external_interface() {
    let (analyzer, _, _, _) = scenario_analyzer();
    let doc = RawDocument::new(b"helpful patrol".to_vec(), DocumentKind::PlainText);

    let report = analyzer.analyze(doc).await.unwrap().into_report().unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert!(value["officers"].is_array());
    assert!(value["departments"].is_array());
    assert!(value["sentiment_score"].is_number());
    assert_eq!(value["sentiment_label"], "POSITIVE");
    assert!(value["topics"].is_array());
}

#[tokio::test]
async fn empty_document_reports_no_text_without_model_calls() {
    let (analyzer, sentiment, topics, entities) = scenario_analyzer();
    let doc = RawDocument::new(b"  \n ".to_vec(), DocumentKind::PlainText);

    let outcome = analyzer.analyze(doc).await.unwrap();

    assert!(outcome.is_no_text());
    assert_eq!(sentiment.call_count(), 0);
    assert_eq!(topics.call_count(), 0);
    assert_eq!(entities.call_count(), 0);
}

#[tokio::test]
async fn undecodable_document_reports_no_text() {
    let (analyzer, sentiment, _, _) = scenario_analyzer();
    let doc = RawDocument::new(vec![0xff, 0xfe, 0x00], DocumentKind::PlainText);

    let outcome = analyzer.analyze(doc).await.unwrap();

    assert!(outcome.is_no_text());
    assert_eq!(sentiment.call_count(), 0);
}

#[tokio::test]
async fn malformed_pdf_reports_no_text() {
    let (analyzer, sentiment, _, _) = scenario_analyzer();
    let doc = RawDocument::new(b"%PDF-1.7 truncated garbage".to_vec(), DocumentKind::Pdf);

    let outcome = analyzer.analyze(doc).await.unwrap();

    assert!(outcome.is_no_text());
    assert_eq!(sentiment.call_count(), 0);
}

#[tokio::test]
async fn repeated_analysis_is_deterministic() {
    let (analyzer, _, _, _) = scenario_analyzer();
    let bytes = b"Officer John Smith at Central Police Station helped rescue a child.".to_vec();

    let first = analyzer
        .analyze(RawDocument::new(bytes.clone(), DocumentKind::PlainText))
        .await
        .unwrap();
    let second = analyzer
        .analyze(RawDocument::new(bytes, DocumentKind::PlainText))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn inference_failure_is_an_error_not_an_empty_report() {
    let analyzer = Analyzer::new(Arc::new(mock::registry(
        MockSentiment::failing(),
        MockTopics::default(),
        MockEntities::default(),
    )));
    let doc = RawDocument::new(b"some feedback".to_vec(), DocumentKind::PlainText);

    assert!(analyzer.analyze(doc).await.is_err());
}
