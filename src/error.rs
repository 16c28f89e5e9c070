// src/error.rs
//! Typed outcomes at the record, platform and run boundaries.

use thiserror::Error;

use crate::ingest::types::Platform;
use crate::report::RunStats;

/// A single raw record could not be mapped into the canonical schema.
/// Recovered locally: the record is skipped and counted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {platform} record: {reason}")]
pub struct MalformedRecordError {
    pub platform: Platform,
    pub reason: String,
}

impl MalformedRecordError {
    pub fn new(platform: Platform, reason: impl Into<String>) -> Self {
        Self {
            platform,
            reason: reason.into(),
        }
    }
}

/// One platform's fetch failed entirely. The run continues with the other platform.
#[derive(Debug, Error)]
#[error("{platform} adapter failed: {cause:#}")]
pub struct AdapterFailure {
    pub platform: Platform,
    pub cause: anyhow::Error,
}

/// Run-level outcomes that stop the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Both adapters failed; there is no data to work with.
    #[error("collection failed on every platform: {play_store}; {app_store}")]
    CollectionFailure {
        play_store: AdapterFailure,
        app_store: AdapterFailure,
    },
    /// Nothing usable survived normalization and filtering. Graceful stop.
    #[error("no reviews left to analyze ({})", empty_detail(.stats))]
    EmptyResult { stats: RunStats },
}

fn empty_detail(stats: &RunStats) -> String {
    format!(
        "{} fetched, {} malformed, {} outside window",
        stats.fetched_total(),
        stats.malformed_total(),
        stats.dropped_out_of_window
    )
}

impl PipelineError {
    /// `true` for the terminal-but-graceful empty outcome.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, PipelineError::EmptyResult { .. })
    }
}
