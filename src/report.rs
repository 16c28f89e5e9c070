// src/report.rs
//! Read-only handoff from the pipeline to reporting consumers (CSV/HTML/charts
//! live outside this crate), plus the run counters.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::analyze::{Intent, IntentSummary};
use crate::ingest::types::{NormalizedReview, Platform, ReviewCollection};
use crate::window::TimeWindow;

/// Per-platform counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    /// Raw records returned by the adapter.
    pub fetched: usize,
    /// Raw records the normalizer rejected.
    pub malformed: usize,
    /// Records left after the time window.
    pub kept: usize,
    /// The adapter failed outright.
    pub failed: bool,
}

/// Every recovered error shows up here; nothing is dropped silently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub play_store: PlatformStats,
    pub app_store: PlatformStats,
    pub dropped_out_of_window: usize,
    pub warnings: Vec<String>,
}

impl RunStats {
    pub fn platform(&self, platform: Platform) -> &PlatformStats {
        match platform {
            Platform::PlayStore => &self.play_store,
            Platform::AppStore => &self.app_store,
        }
    }

    pub fn platform_mut(&mut self, platform: Platform) -> &mut PlatformStats {
        match platform {
            Platform::PlayStore => &mut self.play_store,
            Platform::AppStore => &mut self.app_store,
        }
    }

    pub fn fetched_total(&self) -> usize {
        self.play_store.fetched + self.app_store.fetched
    }

    pub fn malformed_total(&self) -> usize {
        self.play_store.malformed + self.app_store.malformed
    }

    pub fn adapter_failures(&self) -> usize {
        Platform::ALL
            .iter()
            .filter(|&&p| self.platform(p).failed)
            .count()
    }

    /// Exactly one platform's adapter failed.
    pub fn is_partial(&self) -> bool {
        self.adapter_failures() == 1
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    window: TimeWindow,
    reviews: ReviewCollection,
    summary: IntentSummary,
    stats: RunStats,
}

impl RunReport {
    pub(crate) fn new(
        window: TimeWindow,
        reviews: ReviewCollection,
        summary: IntentSummary,
        stats: RunStats,
    ) -> Self {
        Self {
            window,
            reviews,
            summary,
            stats,
        }
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    /// Filtered, classified reviews: Play Store first, then App Store.
    pub fn reviews(&self) -> &[NormalizedReview] {
        &self.reviews
    }

    pub fn summary(&self) -> &IntentSummary {
        &self.summary
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn by_platform(&self, platform: Platform) -> impl Iterator<Item = &NormalizedReview> + '_ {
        self.reviews.iter().filter(move |r| r.platform == platform)
    }

    /// Oldest and newest review timestamps.
    pub fn date_range(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let min = self.reviews.iter().map(|r| r.timestamp).min()?;
        let max = self.reviews.iter().map(|r| r.timestamp).max()?;
        Some((min, max))
    }

    /// Count per unified star rating; index 0 is 1 star.
    pub fn rating_distribution(&self) -> [usize; 5] {
        let mut dist = [0usize; 5];
        for r in &self.reviews {
            if let Some(slot) = dist.get_mut(usize::from(r.rating).wrapping_sub(1)) {
                *slot += 1;
            }
        }
        dist
    }

    pub fn average_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let sum: u64 = self.reviews.iter().map(|r| u64::from(r.rating)).sum();
        Some(sum as f64 / self.reviews.len() as f64)
    }

    /// `reviews_{start}_{end}`, the stem every artifact of this run shares.
    pub fn file_stem(&self) -> String {
        format!("reviews_{}_{}", self.window.start(), self.window.end())
    }

    /// Write the whole handoff as pretty JSON into `dir`. Returns the file path.
    pub fn write_json(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let path = dir.join(format!("{}.json", self.file_stem()));
        let body = serde_json::to_vec_pretty(self).context("serializing run report")?;
        fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    /// Collection and intent summary as structured log lines (no review text).
    pub fn log_summary(&self) {
        info!(
            target: "pipeline",
            start = %self.window.start(),
            end = %self.window.end(),
            play_store_fetched = self.stats.play_store.fetched,
            app_store_fetched = self.stats.app_store.fetched,
            play_store = self.stats.play_store.kept,
            app_store = self.stats.app_store.kept,
            dropped_out_of_window = self.stats.dropped_out_of_window,
            total = self.reviews.len(),
            "collection summary"
        );
        if let Some((min, max)) = self.date_range() {
            info!(target: "pipeline", from = %min.date_naive(), to = %max.date_naive(), "review date range");
        }
        if let Some(avg) = self.average_rating() {
            info!(target: "pipeline", average = %format!("{avg:.2}"), distribution = ?self.rating_distribution(), "ratings");
        }
        for (intent, n) in self.summary.iter() {
            info!(
                target: "pipeline",
                intent = %intent,
                count = n,
                share = %format!("{:.1}%", self.summary.share(intent)),
                "intent"
            );
        }
        if self.stats.malformed_total() > 0 {
            warn!(target: "pipeline", malformed = self.stats.malformed_total(), "malformed reviews skipped");
        }
        for w in &self.stats.warnings {
            warn!(target: "pipeline", warning = %w, "partial collection");
        }
        if self.summary.count(Intent::Unclassified) > 0 {
            info!(
                target: "pipeline",
                unclassified = self.summary.count(Intent::Unclassified),
                "reviews without a matching intent trigger"
            );
        }
    }
}
