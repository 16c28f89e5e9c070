// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod window;

// Store adapters + record normalizer
pub mod ingest;

// Intent taxonomy, lexicon, classifier, summary
pub mod analyze;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{classify_collection, Intent, IntentClassifier, IntentSummary};
pub use crate::config::PipelineConfig;
pub use crate::error::{AdapterFailure, MalformedRecordError, PipelineError};
pub use crate::ingest::types::{NormalizedReview, Platform, RawReview, ReviewSource};
pub use crate::pipeline::run_pipeline;
pub use crate::report::{RunReport, RunStats};
pub use crate::window::{filter_window, TimeWindow};
