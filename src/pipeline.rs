//! # Pipeline Orchestrator
//! collect (both platforms, concurrently) → normalize per platform → concatenate
//! (Play Store, then App Store) → time window → classify → [`RunReport`].
//!
//! Failure policy:
//! - a malformed record is skipped and counted,
//! - one failed adapter degrades to a partial run with a warning,
//! - both adapters failing is [`PipelineError::CollectionFailure`],
//! - nothing left after filtering is [`PipelineError::EmptyResult`]; the
//!   classifier is not invoked in that case.

use chrono::NaiveDate;
use metrics::{counter, gauge};
use tracing::{info, warn};

use crate::analyze::{classify_collection, IntentClassifier};
use crate::config::PipelineConfig;
use crate::error::{AdapterFailure, PipelineError};
use crate::ingest::normalize::normalize_batch;
use crate::ingest::types::{Platform, RawReview, ReviewCollection, ReviewSource};
use crate::ingest::{collect_from, ensure_metrics_described};
use crate::report::{RunReport, RunStats};
use crate::window::{filter_window, TimeWindow};

/// Run the whole pipeline once for `run_date`.
///
/// `play_store` and `app_store` fill fixed slots; their output order in the
/// merged collection never depends on which fetch finishes first.
pub async fn run_pipeline(
    config: &PipelineConfig,
    play_store: &dyn ReviewSource,
    app_store: &dyn ReviewSource,
    classifier: &IntentClassifier,
    run_date: NaiveDate,
) -> Result<RunReport, PipelineError> {
    ensure_metrics_described();

    let window = TimeWindow::trailing(run_date, config.days);
    info!(
        target: "pipeline",
        start = %window.start(),
        end = %window.end(),
        review_count = config.review_count,
        days = config.days,
        "collecting reviews"
    );

    // Both fetches in flight at once; each result is buffered separately.
    let (play_res, app_res) = tokio::join!(
        collect_from(play_store, config.review_count, config.days),
        collect_from(app_store, config.review_count, config.days),
    );

    let mut stats = RunStats::default();
    let mut merged: ReviewCollection = Vec::new();
    let play_fail = absorb(Platform::PlayStore, play_res, &mut stats, &mut merged);
    let app_fail = absorb(Platform::AppStore, app_res, &mut stats, &mut merged);

    match (play_fail, app_fail) {
        (Some(play_store), Some(app_store)) => {
            return Err(PipelineError::CollectionFailure {
                play_store,
                app_store,
            });
        }
        (Some(f), None) | (None, Some(f)) => {
            let msg = format!("{f}; continuing with the other platform only");
            warn!(target: "pipeline", platform = %f.platform, "partial collection");
            stats.warnings.push(msg);
        }
        (None, None) => {}
    }

    let filtered = filter_window(merged, &window);
    stats.dropped_out_of_window = filtered.dropped;
    for platform in Platform::ALL {
        stats.platform_mut(platform).kept =
            filtered.kept.iter().filter(|r| r.platform == platform).count();
    }

    if filtered.kept.is_empty() {
        info!(
            target: "pipeline",
            fetched = stats.fetched_total(),
            malformed = stats.malformed_total(),
            dropped = stats.dropped_out_of_window,
            "no reviews inside the window"
        );
        return Err(PipelineError::EmptyResult { stats });
    }

    let (reviews, summary) = classify_collection(filtered.kept, classifier);

    gauge!("pipeline_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
    Ok(RunReport::new(window, reviews, summary, stats))
}

/// Fold one adapter's outcome into the run: normalize and append on success,
/// record the failure otherwise.
fn absorb(
    platform: Platform,
    res: Result<Vec<RawReview>, AdapterFailure>,
    stats: &mut RunStats,
    merged: &mut ReviewCollection,
) -> Option<AdapterFailure> {
    match res {
        Ok(raws) => {
            let fetched = raws.len();
            let (batch, malformed) = normalize_batch(platform, raws);
            if malformed > 0 {
                counter!("ingest_malformed_total").increment(malformed as u64);
                warn!(target: "pipeline", %platform, malformed, "skipped malformed reviews");
            }
            let s = stats.platform_mut(platform);
            s.fetched = fetched;
            s.malformed = malformed;
            merged.extend(batch);
            None
        }
        Err(f) => {
            stats.platform_mut(platform).failed = true;
            Some(f)
        }
    }
}
