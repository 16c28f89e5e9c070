// src/analyze/mod.rs
//! Intent analysis: taxonomy, trigger lexicon, classifier and frequency summary.

pub mod classifier;
pub mod intent;
pub mod lexicon;
pub mod summary;

use metrics::counter;

use crate::ingest::types::ReviewCollection;

// Re-export convenient types.
pub use crate::analyze::classifier::IntentClassifier;
pub use crate::analyze::intent::Intent;
pub use crate::analyze::lexicon::Lexicon;
pub use crate::analyze::summary::IntentSummary;

/// Label every review and tally the labels.
///
/// Consumes the filtered collection and returns it with `intent` set on every
/// record, order unchanged. The summary total always equals the returned length.
pub fn classify_collection(
    reviews: ReviewCollection,
    classifier: &IntentClassifier,
) -> (ReviewCollection, IntentSummary) {
    let mut summary = IntentSummary::default();
    let labeled: ReviewCollection = reviews
        .into_iter()
        .map(|mut r| {
            let intent = classifier.classify(&r.text);
            summary.record(intent);
            r.intent = Some(intent);
            r
        })
        .collect();

    counter!("classify_reviews_total").increment(labeled.len() as u64);
    tracing::debug!(
        target: "pipeline",
        classified = labeled.len(),
        unclassified = summary.count(Intent::Unclassified),
        "intent classification done"
    );
    (labeled, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::{NormalizedReview, Platform};
    use chrono::DateTime;

    fn review(text: &str) -> NormalizedReview {
        NormalizedReview {
            platform: Platform::PlayStore,
            timestamp: DateTime::parse_from_rfc3339("2024-05-03T10:00:00Z").unwrap(),
            rating: 3,
            text: text.to_string(),
            author: None,
            source_id: None,
            app_version: None,
            intent: None,
        }
    }

    #[test]
    fn every_record_gets_a_label_and_counts_add_up() {
        let input = vec![
            review("crashes on start"),
            review(""),
            review("love it"),
            review("please add dark mode"),
            review("crash crash"),
        ];
        let (out, summary) = classify_collection(input, IntentClassifier::builtin());
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|r| r.intent.is_some()));
        assert_eq!(summary.total(), out.len());
        assert_eq!(summary.count(Intent::BugReport), 2);
        assert_eq!(summary.count(Intent::Unclassified), 1);
        assert_eq!(summary, IntentSummary::tally(&out));
    }

    #[test]
    fn order_is_preserved() {
        let input = vec![review("b"), review("a"), review("c")];
        let (out, _) = classify_collection(input, IntentClassifier::builtin());
        let texts: Vec<&str> = out.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "a", "c"]);
    }
}
