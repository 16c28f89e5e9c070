// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analyze::intent::Intent;

/// Review platform a record came from. Collection order follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    PlayStore,
    AppStore,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::PlayStore, Platform::AppStore];

    pub fn label(self) -> &'static str {
        match self {
            Platform::PlayStore => "Play Store",
            Platform::AppStore => "App Store",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Play Store review as produced by scraper exports (camelCase JSON).
/// Decoded one object at a time; an object that does not fit this layout
/// becomes [`RawReview::Undecodable`] instead of failing the export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayStoreReview {
    #[serde(default)]
    pub review_id: String,
    pub user_name: Option<String>,
    pub content: Option<String>,
    /// Native 1..=5 star score.
    pub score: Option<i64>,
    pub thumbs_up_count: Option<u64>,
    #[serde(alias = "appVersion")]
    pub review_created_version: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS` (UTC) or RFC 3339.
    pub at: Option<String>,
}

/// App Store review flattened out of the iTunes customer-reviews feed entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppStoreReview {
    pub id: String,
    pub author: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    /// Star count as the feed publishes it, e.g. `"4"`.
    pub rating: Option<String>,
    /// RFC 3339 with the storefront's offset.
    pub updated: Option<String>,
    pub version: Option<String>,
}

/// Raw record in its platform's own layout. Lives only until normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawReview {
    PlayStore(PlayStoreReview),
    AppStore(AppStoreReview),
    /// An element the adapter could not decode. Carried to the normalizer so it
    /// is counted as malformed rather than failing the whole fetch.
    Undecodable { platform: Platform, reason: String },
}

impl RawReview {
    pub fn platform(&self) -> Platform {
        match self {
            RawReview::PlayStore(_) => Platform::PlayStore,
            RawReview::AppStore(_) => Platform::AppStore,
            RawReview::Undecodable { platform, .. } => *platform,
        }
    }

    /// Store-assigned review id, when the record decoded.
    pub fn source_id(&self) -> Option<&str> {
        match self {
            RawReview::PlayStore(r) => Some(r.review_id.as_str()),
            RawReview::AppStore(r) => Some(r.id.as_str()),
            RawReview::Undecodable { .. } => None,
        }
    }
}

/// Canonical review record shared by every later stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedReview {
    pub platform: Platform,
    /// Instant plus the source-local offset; day comparisons use the local date.
    pub timestamp: DateTime<FixedOffset>,
    /// Unified 1..=5 scale.
    pub rating: u8,
    pub text: String,
    pub author: Option<String>,
    pub source_id: Option<String>,
    pub app_version: Option<String>,
    /// `None` until the classifier runs; means "not classified yet".
    pub intent: Option<Intent>,
}

impl NormalizedReview {
    /// Calendar date in the platform-local offset.
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Ordered collection: Play Store batch first, then App Store, each stable.
pub type ReviewCollection = Vec<NormalizedReview>;

#[async_trait::async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetch up to `limit` recent reviews. "No results" is `Ok(vec![])`;
    /// errors are reserved for transport/decoding failures.
    async fn collect(&self, limit: usize, window_hint_days: u32) -> Result<Vec<RawReview>>;

    fn platform(&self) -> Platform;

    fn name(&self) -> &'static str {
        self.platform().label()
    }
}
