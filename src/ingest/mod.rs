// src/ingest/mod.rs
pub mod normalize;
pub mod providers;
pub mod types;

use crate::error::AdapterFailure;
use crate::ingest::types::{RawReview, ReviewSource};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, histogram};
use once_cell::sync::OnceCell;

/// Upper bound on review text kept per record (chars).
pub const TEXT_CAP: usize = 5_000;

/// One-time metrics registration (so series show up on any installed exporter).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_reviews_total", "Raw reviews returned by adapters.");
        describe_counter!(
            "ingest_malformed_total",
            "Raw reviews skipped because they could not be normalized."
        );
        describe_counter!(
            "ingest_adapter_errors_total",
            "Adapter fetches that failed entirely."
        );
        describe_counter!(
            "window_dropped_total",
            "Normalized reviews outside the run's time window."
        );
        describe_counter!("classify_reviews_total", "Reviews labeled by the intent classifier.");
        describe_counter!(
            "ingest_text_truncated_total",
            "Review texts cut at the length cap."
        );
        describe_histogram!("ingest_fetch_ms", "Adapter fetch time in milliseconds.");
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the review pipeline last ran."
        );
    });
}

/// Normalize review text: decode entities, strip tags, fold quotes, collapse whitespace.
/// Sentence punctuation is kept; `?` and `!` carry intent.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags (known markup only; "<Settings>" in prose stays)
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| {
        regex::Regex::new(
            r"(?is)</?(?:a|b|blockquote|br|code|div|em|font|h[1-6]|hr|i|img|li|ol|p|pre|small|span|strong|sub|sup|u|ul)\b[^>]*>",
        )
        .expect("tag regex")
    });
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace (incl. NBSP)
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("whitespace regex"));
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap
    let chars = out.chars().count();
    if chars > TEXT_CAP {
        counter!("ingest_text_truncated_total").increment(1);
        tracing::debug!(target: "ingest", chars, cap = TEXT_CAP, "review text truncated");
        out = out.chars().take(TEXT_CAP).collect();
    }

    out
}

/// Run one adapter, timing it and converting failure into an [`AdapterFailure`].
pub async fn collect_from(
    source: &dyn ReviewSource,
    limit: usize,
    window_hint_days: u32,
) -> Result<Vec<RawReview>, AdapterFailure> {
    ensure_metrics_described();
    let platform = source.platform();
    let t0 = std::time::Instant::now();

    let res = source.collect(limit, window_hint_days).await;
    histogram!("ingest_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    match res {
        Ok(raws) => {
            counter!("ingest_reviews_total").increment(raws.len() as u64);
            tracing::info!(
                target: "ingest",
                provider = source.name(),
                fetched = raws.len(),
                "adapter finished"
            );
            Ok(raws)
        }
        Err(e) => {
            tracing::warn!(target: "ingest", error = ?e, provider = source.name(), "provider error");
            counter!("ingest_adapter_errors_total").increment(1);
            Err(AdapterFailure { platform, cause: e })
        }
    }
}
