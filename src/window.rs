//! # Time Window
//! Trailing, day-granular window over which reviews are kept.
//!
//! `end` is the run date and `start = end - days`; both bounds cover the whole
//! day. Records are compared by their platform-local calendar date, so
//! `start 00:00:00` and `end 23:59:59` local time are both inside.

use chrono::{Duration, NaiveDate};
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::ingest::types::{NormalizedReview, ReviewCollection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TimeWindow {
    /// Window of `days` days ending on `end` (inclusive).
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn contains(&self, review: &NormalizedReview) -> bool {
        self.contains_date(review.local_date())
    }
}

/// Result of filtering a collection against a window.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub kept: ReviewCollection,
    pub dropped: usize,
}

/// Keep records inside `window`, preserving relative order. Never fails;
/// records outside are only counted. Idempotent for a fixed window.
pub fn filter_window(reviews: ReviewCollection, window: &TimeWindow) -> FilterOutcome {
    let before = reviews.len();
    let kept: ReviewCollection = reviews.into_iter().filter(|r| window.contains(r)).collect();
    let dropped = before - kept.len();

    if dropped > 0 {
        counter!("window_dropped_total").increment(dropped as u64);
    }
    tracing::debug!(
        target: "pipeline",
        start = %window.start,
        end = %window.end,
        kept = kept.len(),
        dropped,
        "time window applied"
    );
    FilterOutcome { kept, dropped }
}
