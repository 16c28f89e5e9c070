//! Record normalizer: maps each platform's raw layout into [`NormalizedReview`].
//!
//! Rating policy (unified scale 1..=5):
//! - Play Store publishes 1..=5 stars as an integer; mapped 1:1.
//! - App Store publishes 1..=5 stars as a string label; parsed, then mapped 1:1.
//!
//! Anything outside 1..=5 is rejected rather than clamped, so the mapping stays
//! total over valid input and monotonic.
//!
//! Timestamps: RFC 3339 keeps its offset; naive `YYYY-MM-DD HH:MM:SS` values
//! (Play Store exports) are taken as UTC.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::error::MalformedRecordError;
use crate::ingest::normalize_text;
use crate::ingest::types::{AppStoreReview, NormalizedReview, Platform, PlayStoreReview, RawReview};

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Normalize one raw record that was collected from `platform`.
pub fn normalize_review(
    raw: RawReview,
    platform: Platform,
) -> Result<NormalizedReview, MalformedRecordError> {
    if raw.platform() != platform {
        return Err(MalformedRecordError::new(
            platform,
            format!("record shaped as {} arrived from {}", raw.platform(), platform),
        ));
    }
    match raw {
        RawReview::PlayStore(r) => normalize_play_store(r),
        RawReview::AppStore(r) => normalize_app_store(r),
        RawReview::Undecodable { reason, .. } => Err(MalformedRecordError::new(
            platform,
            format!("undecodable record: {reason}"),
        )),
    }
}

/// Normalize a whole batch, skipping malformed records.
/// Returns `(normalized, malformed_count)`; relative order is preserved.
pub fn normalize_batch(
    platform: Platform,
    raws: Vec<RawReview>,
) -> (Vec<NormalizedReview>, usize) {
    let mut out = Vec::with_capacity(raws.len());
    let mut malformed = 0usize;
    for raw in raws {
        match normalize_review(raw, platform) {
            Ok(r) => out.push(r),
            Err(e) => {
                malformed += 1;
                tracing::debug!(target: "ingest", %platform, reason = %e.reason, "skipping malformed review");
            }
        }
    }
    (out, malformed)
}

/// Map a platform-native star rating onto the unified scale.
pub fn unify_rating(platform: Platform, raw: i64) -> Result<u8, MalformedRecordError> {
    // Both stores are natively five-star; identity inside bounds.
    if (RATING_MIN as i64..=RATING_MAX as i64).contains(&raw) {
        Ok(raw as u8)
    } else {
        Err(MalformedRecordError::new(
            platform,
            format!("rating {raw} outside {RATING_MIN}..={RATING_MAX}"),
        ))
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc().into())
}

fn normalize_play_store(r: PlayStoreReview) -> Result<NormalizedReview, MalformedRecordError> {
    let platform = Platform::PlayStore;
    let timestamp = required_timestamp(platform, r.at.as_deref())?;
    let score = r
        .score
        .ok_or_else(|| MalformedRecordError::new(platform, "missing score"))?;
    let rating = unify_rating(platform, score)?;

    Ok(NormalizedReview {
        platform,
        timestamp,
        rating,
        text: normalize_text(r.content.as_deref().unwrap_or_default()),
        author: r.user_name,
        source_id: non_empty(r.review_id),
        app_version: r.review_created_version,
        intent: None,
    })
}

fn normalize_app_store(r: AppStoreReview) -> Result<NormalizedReview, MalformedRecordError> {
    let platform = Platform::AppStore;
    let timestamp = required_timestamp(platform, r.updated.as_deref())?;
    let label = r
        .rating
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| MalformedRecordError::new(platform, "missing rating"))?;
    let raw_rating: i64 = label
        .parse()
        .map_err(|_| MalformedRecordError::new(platform, format!("rating label {label:?} is not a number")))?;
    let rating = unify_rating(platform, raw_rating)?;

    let title = normalize_text(r.title.as_deref().unwrap_or_default());
    let body = normalize_text(r.content.as_deref().unwrap_or_default());

    Ok(NormalizedReview {
        platform,
        timestamp,
        rating,
        text: join_title_body(&title, &body),
        author: r.author,
        source_id: non_empty(r.id),
        app_version: r.version,
        intent: None,
    })
}

fn required_timestamp(
    platform: Platform,
    raw: Option<&str>,
) -> Result<DateTime<FixedOffset>, MalformedRecordError> {
    let raw = raw.ok_or_else(|| MalformedRecordError::new(platform, "missing timestamp"))?;
    parse_timestamp(raw)
        .ok_or_else(|| MalformedRecordError::new(platform, format!("unparseable timestamp {raw:?}")))
}

/// App Store reviews carry a headline; it usually states the intent, so keep it.
fn join_title_body(title: &str, body: &str) -> String {
    match (title.is_empty(), body.is_empty()) {
        (true, _) => body.to_string(),
        (false, true) => title.to_string(),
        (false, false) => {
            let ends_sentence = title.ends_with(['.', '!', '?']);
            if ends_sentence {
                format!("{title} {body}")
            } else {
                format!("{title}. {body}")
            }
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
