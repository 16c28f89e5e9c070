// tests/e2e_fixtures.rs
// Whole pipeline over the recorded store fixtures, pinned to 2024-05-07.

use chrono::{NaiveDate, TimeZone, Utc};
use mapp_review_analyzer::ingest::providers::app_store::AppStoreFeed;
use mapp_review_analyzer::ingest::providers::play_store::PlayStoreExport;
use mapp_review_analyzer::{run_pipeline, Intent, IntentClassifier, PipelineConfig, Platform};
use std::fs;

const PAGE1: &str = include_str!("fixtures/app_store_page1.json");
const PAGE2: &str = include_str!("fixtures/app_store_page2.json");
const PLAY_EXPORT: &str = include_str!("fixtures/play_store_export.json");

async fn run() -> mapp_review_analyzer::RunReport {
    let now = Utc.with_ymd_and_hms(2024, 5, 7, 12, 0, 0).unwrap();
    let play_store = PlayStoreExport::from_fixture_str("com.example.budget", PLAY_EXPORT).as_of(now);
    let app_store = AppStoreFeed::from_fixture_pages(vec![PAGE1, PAGE2]).as_of(now);
    let cfg = PipelineConfig {
        days: 6,
        ..Default::default()
    };
    run_pipeline(
        &cfg,
        &play_store,
        &app_store,
        IntentClassifier::builtin(),
        NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
    )
    .await
    .expect("fixture run succeeds")
}

#[tokio::test]
async fn fixtures_window_and_counters() {
    let report = run().await;
    assert_eq!(report.window().start(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

    let s = report.stats();
    assert_eq!((s.play_store.fetched, s.play_store.malformed, s.play_store.kept), (6, 1, 4));
    assert_eq!((s.app_store.fetched, s.app_store.malformed, s.app_store.kept), (7, 1, 4));
    assert_eq!(s.dropped_out_of_window, 3);
    assert!(s.warnings.is_empty());

    let ids: Vec<&str> = report
        .reviews()
        .iter()
        .map(|r| r.source_id.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(
        ids,
        vec![
            "gp:AOqpTOE-2",
            "gp:AOqpTOE-1",
            "gp:AOqpTOE-3",
            "gp:AOqpTOE-5",
            "11001",
            "11002",
            "11003",
            "11005"
        ]
    );
    assert_eq!(report.by_platform(Platform::PlayStore).count(), 4);
    assert!(report
        .reviews()
        .iter()
        .all(|r| report.window().contains(r)));
}

#[tokio::test]
async fn fixtures_intents() {
    let report = run().await;
    let labels: Vec<Intent> = report.reviews().iter().filter_map(|r| r.intent).collect();
    assert_eq!(
        labels,
        vec![
            Intent::Praise,
            Intent::BugReport,
            Intent::Unclassified,
            Intent::Question,
            Intent::BugReport,
            Intent::Praise,
            Intent::FeatureRequest,
            Intent::Question
        ]
    );

    let sum = report.summary();
    assert_eq!(sum.count(Intent::BugReport), 2);
    assert_eq!(sum.count(Intent::Praise), 2);
    assert_eq!(sum.count(Intent::Question), 2);
    assert_eq!(sum.count(Intent::FeatureRequest), 1);
    assert_eq!(sum.count(Intent::Unclassified), 1);
    assert_eq!(sum.count(Intent::Complaint), 0);
    assert_eq!(sum.total(), report.reviews().len());
}

#[tokio::test]
async fn fixtures_handoff_file() {
    let report = run().await;
    let dir = tempfile::tempdir().unwrap();
    let path = report.write_json(dir.path()).unwrap();
    assert!(path.ends_with("reviews_2024-05-01_2024-05-07.json"));

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(v["reviews"].as_array().unwrap().len(), 8);
    assert_eq!(v["reviews"][4]["platform"], "app_store");
    assert_eq!(v["reviews"][4]["intent"], "bug_report");
    assert_eq!(v["summary"]["counts"]["question"], 2);
    assert_eq!(v["stats"]["dropped_out_of_window"], 3);
    // Entities decoded, headline joined.
    assert_eq!(
        v["reviews"][5]["text"],
        "Love it. Great app, easy to use & really helpful."
    );
}
