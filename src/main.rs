//! Mobile app review analyzer: binary entrypoint.
//! Loads config, collects Play Store + App Store reviews, classifies intent and
//! writes the run report as JSON for the reporting tools.

use anyhow::{Context, Result};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mapp_review_analyzer::config::load_config_default;
use mapp_review_analyzer::ingest::providers::{app_store::AppStoreFeed, play_store::PlayStoreExport};
use mapp_review_analyzer::{run_pipeline, IntentClassifier, PipelineError};

/// Compact logs; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mapp_review_analyzer=info,mapp_review=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

async fn run() -> Result<ExitCode> {
    let cfg = load_config_default().context("loading configuration")?;
    info!(
        play_store_package = %cfg.play_store.package,
        app_store_id = %cfg.app_store.app_id,
        review_count = cfg.review_count,
        days = cfg.days,
        "configuration"
    );
    if cfg.play_store.package.is_empty() || cfg.app_store.app_id.is_empty() {
        warn!("a platform identifier is empty; that platform's fetch will likely fail");
    }

    let classifier = IntentClassifier::load(cfg.lexicon_path.as_deref())
        .context("loading intent lexicon")?;

    let timeout = cfg.http_timeout();
    let play_store = PlayStoreExport::from_url(&cfg.play_store.package, &cfg.play_store.export_url, timeout);
    let app_store = AppStoreFeed::new(&cfg.app_store.app_id, &cfg.app_store.country, timeout);

    let run_date = chrono::Local::now().date_naive();
    match run_pipeline(&cfg, &play_store, &app_store, &classifier, run_date).await {
        Ok(report) => {
            report.log_summary();
            let path = report.write_json(&cfg.output_dir)?;
            info!(path = %path.display(), "run report written");
            info!(days = cfg.days, "review analysis complete");
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ PipelineError::EmptyResult { .. }) => {
            info!("{e}; nothing to report");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "review collection failed");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            error!(error = ?e, "fatal");
            ExitCode::FAILURE
        }
    }
}
