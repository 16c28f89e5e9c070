// src/ingest/providers/play_store.rs
//! Play Store reviews from a JSON export (array of scraper-shaped objects),
//! either fetched from a URL or held in memory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Reverse;
use std::time::Duration;

use super::hint_cutoff;
use crate::ingest::normalize::parse_timestamp;
use crate::ingest::types::{Platform, PlayStoreReview, RawReview, ReviewSource};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExportDoc {
    Bare(Vec<Value>),
    Wrapped { reviews: Vec<Value> },
}

/// Parse an export document. Only the outer shape can fail; each element is
/// decoded on its own and a misfit becomes [`RawReview::Undecodable`].
pub fn parse_export(body: &str) -> Result<Vec<RawReview>> {
    let doc: ExportDoc = serde_json::from_str(body).context("parsing play store export json")?;
    let items = match doc {
        ExportDoc::Bare(v) => v,
        ExportDoc::Wrapped { reviews } => reviews,
    };
    Ok(items.into_iter().map(decode_review).collect())
}

fn decode_review(item: Value) -> RawReview {
    match serde_json::from_value::<PlayStoreReview>(item) {
        Ok(r) => RawReview::PlayStore(r),
        Err(e) => RawReview::Undecodable {
            platform: Platform::PlayStore,
            reason: e.to_string(),
        },
    }
}

fn posted_at(raw: &RawReview) -> Option<DateTime<FixedOffset>> {
    match raw {
        RawReview::PlayStore(r) => r.at.as_deref().and_then(parse_timestamp),
        _ => None,
    }
}

pub struct PlayStoreExport {
    package: String,
    mode: Mode,
    as_of: Option<DateTime<Utc>>,
}

enum Mode {
    Fixture(String),
    Http {
        client: reqwest::Client,
        url: String,
        timeout: Duration,
    },
}

impl PlayStoreExport {
    /// `url` may contain `{package}`, substituted with the package name.
    pub fn from_url(package: impl Into<String>, url: &str, timeout: Duration) -> Self {
        let package = package.into();
        Self {
            mode: Mode::Http {
                client: reqwest::Client::new(),
                url: url.replace("{package}", &package),
                timeout,
            },
            package,
            as_of: None,
        }
    }

    pub fn from_fixture_str(package: impl Into<String>, s: &str) -> Self {
        Self {
            package: package.into(),
            mode: Mode::Fixture(s.to_string()),
            as_of: None,
        }
    }

    /// Pin "now" for the window-hint cutoff (defaults to the wall clock).
    pub fn as_of(mut self, now: DateTime<Utc>) -> Self {
        self.as_of = Some(now);
        self
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    async fn fetch_body(&self) -> Result<String> {
        match &self.mode {
            Mode::Fixture(s) => Ok(s.clone()),
            Mode::Http {
                client,
                url,
                timeout,
            } => client
                .get(url)
                .timeout(*timeout)
                .send()
                .await
                .context("play store http get()")?
                .error_for_status()
                .context("play store http status")?
                .text()
                .await
                .context("play store http .text()"),
        }
    }
}

#[async_trait]
impl ReviewSource for PlayStoreExport {
    async fn collect(&self, limit: usize, window_hint_days: u32) -> Result<Vec<RawReview>> {
        let body = self.fetch_body().await?;
        let mut reviews = parse_export(&body)?;
        let cutoff = hint_cutoff(self.as_of.unwrap_or_else(Utc::now), window_hint_days);

        // Newest first; undecodable records and unreadable dates sink to the
        // end but stay, so the normalizer can count them.
        reviews.sort_by_key(|r| Reverse(posted_at(r)));
        reviews.truncate(limit);
        reviews.retain(|r| match (cutoff, posted_at(r)) {
            (Some(c), Some(ts)) => ts >= c,
            _ => true,
        });

        tracing::debug!(target: "ingest", package = %self.package, kept = reviews.len(), "play store export read");
        Ok(reviews)
    }

    fn platform(&self) -> Platform {
        Platform::PlayStore
    }
}
