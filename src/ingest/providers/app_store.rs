// src/ingest/providers/app_store.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::hint_cutoff;
use crate::ingest::normalize::parse_timestamp;
use crate::ingest::types::{AppStoreReview, Platform, RawReview, ReviewSource};

/// The public feed serves at most 10 pages of 50 entries.
pub const MAX_PAGES: u32 = 10;
const DEFAULT_BASE_URL: &str = "https://itunes.apple.com";

#[derive(Debug, Deserialize)]
struct FeedDoc {
    feed: Feed,
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    entry: Option<OneOrMany<Value>>,
}

/// The feed collapses a single-entry page into a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(t) => vec![t],
        }
    }
}

#[derive(Debug, Deserialize)]
struct Label {
    label: String,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: Option<Label>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: Option<Label>,
    author: Option<Author>,
    updated: Option<Label>,
    title: Option<Label>,
    content: Option<Label>,
    #[serde(rename = "im:rating")]
    rating: Option<Label>,
    #[serde(rename = "im:version")]
    version: Option<Label>,
}

/// Parse one page of the customer-reviews JSON feed.
/// Entries without a rating (the app's own metadata entry) are skipped; an
/// entry that does not fit the layout becomes [`RawReview::Undecodable`].
pub fn parse_feed_page(body: &str) -> Result<Vec<RawReview>> {
    let doc: FeedDoc = serde_json::from_str(body).context("parsing app store feed json")?;
    let entries = doc.feed.entry.map(OneOrMany::into_vec).unwrap_or_default();

    Ok(entries
        .into_iter()
        .filter(|e| e.get("im:rating").is_some())
        .map(decode_entry)
        .collect())
}

fn decode_entry(entry: Value) -> RawReview {
    match serde_json::from_value::<Entry>(entry) {
        Ok(e) => RawReview::AppStore(AppStoreReview {
            id: e.id.map(|l| l.label).unwrap_or_default(),
            author: e.author.and_then(|a| a.name).map(|l| l.label),
            title: e.title.map(|l| l.label),
            content: e.content.map(|l| l.label),
            rating: e.rating.map(|l| l.label),
            updated: e.updated.map(|l| l.label),
            version: e.version.map(|l| l.label),
        }),
        Err(e) => RawReview::Undecodable {
            platform: Platform::AppStore,
            reason: e.to_string(),
        },
    }
}

fn updated_at(raw: &RawReview) -> Option<DateTime<FixedOffset>> {
    match raw {
        RawReview::AppStore(r) => r.updated.as_deref().and_then(parse_timestamp),
        _ => None,
    }
}

pub struct AppStoreFeed {
    mode: Mode,
    as_of: Option<DateTime<Utc>>,
}

enum Mode {
    Fixture(Vec<String>),
    Http {
        client: reqwest::Client,
        base_url: String,
        country: String,
        app_id: String,
        timeout: Duration,
    },
}

impl AppStoreFeed {
    /// Live feed for `app_id` in the given storefront (`"us"`, `"kr"`, ...).
    pub fn new(app_id: impl Into<String>, country: impl Into<String>, timeout: Duration) -> Self {
        Self {
            mode: Mode::Http {
                client: reqwest::Client::new(),
                base_url: DEFAULT_BASE_URL.to_string(),
                country: country.into(),
                app_id: app_id.into(),
                timeout,
            },
            as_of: None,
        }
    }

    /// Serve pre-recorded feed pages in order (page 1 first).
    pub fn from_fixture_pages<S: Into<String>>(pages: Vec<S>) -> Self {
        Self {
            mode: Mode::Fixture(pages.into_iter().map(Into::into).collect()),
            as_of: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        if let Mode::Http { base_url, .. } = &mut self.mode {
            *base_url = url.into().trim_end_matches('/').to_string();
        }
        self
    }

    /// Pin "now" for the paging cutoff (defaults to the wall clock).
    pub fn as_of(mut self, now: DateTime<Utc>) -> Self {
        self.as_of = Some(now);
        self
    }

    async fn fetch_page(&self, page: u32) -> Result<Option<String>> {
        match &self.mode {
            Mode::Fixture(pages) => Ok(pages.get(page as usize - 1).cloned()),
            Mode::Http {
                client,
                base_url,
                country,
                app_id,
                timeout,
            } => {
                let url = format!(
                    "{base_url}/{country}/rss/customerreviews/page={page}/id={app_id}/sortby=mostrecent/json"
                );
                let body = client
                    .get(&url)
                    .timeout(*timeout)
                    .send()
                    .await
                    .context("app store http get()")?
                    .error_for_status()
                    .context("app store http status")?
                    .text()
                    .await
                    .context("app store http .text()")?;
                Ok(Some(body))
            }
        }
    }
}

#[async_trait]
impl ReviewSource for AppStoreFeed {
    async fn collect(&self, limit: usize, window_hint_days: u32) -> Result<Vec<RawReview>> {
        let cutoff = hint_cutoff(self.as_of.unwrap_or_else(Utc::now), window_hint_days);
        let mut out = Vec::new();

        for page in 1..=MAX_PAGES {
            if out.len() >= limit {
                break;
            }
            let Some(body) = self.fetch_page(page).await? else {
                break;
            };
            let reviews = parse_feed_page(&body).with_context(|| format!("app store page {page}"))?;
            if reviews.is_empty() {
                break;
            }

            // Feed is newest-first; once a page reaches past the hint, later pages are older still.
            let reached_cutoff = cutoff.is_some_and(|c| {
                reviews.iter().filter_map(updated_at).any(|ts| ts < c)
            });

            let room = limit - out.len();
            out.extend(reviews.into_iter().take(room));

            if reached_cutoff {
                tracing::debug!(target: "ingest", page, "app store paging reached window hint");
                break;
            }
        }

        Ok(out)
    }

    fn platform(&self) -> Platform {
        Platform::AppStore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(raw: &RawReview) -> &AppStoreReview {
        match raw {
            RawReview::AppStore(r) => r,
            other => panic!("expected an app store review, got {other:?}"),
        }
    }

    #[test]
    fn single_entry_page_is_an_object() {
        let body = r#"{"feed":{"entry":{
            "id":{"label":"1"},"updated":{"label":"2024-05-02T10:00:00-07:00"},
            "im:rating":{"label":"4"},"title":{"label":"t"},"content":{"label":"c"}}}}"#;
        let out = parse_feed_page(body).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(review(&out[0]).rating.as_deref(), Some("4"));
    }

    #[test]
    fn page_without_entries_is_empty() {
        let out = parse_feed_page(r#"{"feed":{"author":{"name":{"label":"iTunes"}}}}"#).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn metadata_entry_is_skipped() {
        let body = r#"{"feed":{"entry":[
            {"id":{"label":"app"},"title":{"label":"My App"}},
            {"id":{"label":"2"},"updated":{"label":"2024-05-02T10:00:00Z"},"im:rating":{"label":"1"}}]}}"#;
        let out = parse_feed_page(body).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(review(&out[0]).id, "2");
    }

    #[test]
    fn misshapen_entry_stays_in_the_page() {
        let body = r#"{"feed":{"entry":[
            {"id":{"label":"1"},"updated":{"label":"2024-05-02T10:00:00Z"},"im:rating":{"label":"5"}},
            {"id":{"label":"2"},"updated":{"label":"2024-05-02T09:00:00Z"},"im:rating":{"label":5}},
            {"id":{"label":"3"},"updated":{"label":"2024-05-02T08:00:00Z"},"im:rating":{"label":"2"}}]}}"#;
        let out = parse_feed_page(body).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(review(&out[0]).id, "1");
        assert!(matches!(out[1], RawReview::Undecodable { platform: Platform::AppStore, .. }));
        assert_eq!(review(&out[2]).id, "3");
    }

    #[test]
    fn broken_json_is_an_error() {
        assert!(parse_feed_page("<html>").is_err());
    }
}
