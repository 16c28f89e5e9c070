// src/config.rs
//! Run configuration, built once at start-up and passed down by reference.
//!
//! Resolution:
//! 1) $MAPP_CONFIG_PATH (must exist when set)
//! 2) config/mapp.toml
//! 3) config/mapp.json
//! 4) built-in defaults
//!
//! then env overrides (`MAPP_REVIEW_COUNT`, `MAPP_DAYS`, `MAPP_PLAYSTORE_PACKAGE`,
//! `MAPP_APPSTORE_APP_ID`, `MAPP_OUTPUT_DIR`) and validation.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "MAPP_CONFIG_PATH";
pub const ENV_REVIEW_COUNT: &str = "MAPP_REVIEW_COUNT";
pub const ENV_DAYS: &str = "MAPP_DAYS";
pub const ENV_PLAYSTORE_PACKAGE: &str = "MAPP_PLAYSTORE_PACKAGE";
pub const ENV_APPSTORE_APP_ID: &str = "MAPP_APPSTORE_APP_ID";
pub const ENV_OUTPUT_DIR: &str = "MAPP_OUTPUT_DIR";

fn default_review_count() -> usize {
    200
}
fn default_days() -> u32 {
    7
}
fn default_country() -> String {
    "us".to_string()
}
fn default_export_url() -> String {
    "http://localhost:8080/playstore/{package}.json".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_http_timeout_secs() -> u64 {
    20
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayStoreConfig {
    /// Android package name, e.g. `com.example.app`. Opaque to the pipeline.
    #[serde(default)]
    pub package: String,
    /// JSON export endpoint; `{package}` is substituted.
    #[serde(default = "default_export_url")]
    pub export_url: String,
}

impl Default for PlayStoreConfig {
    fn default() -> Self {
        Self {
            package: String::new(),
            export_url: default_export_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppStoreConfig {
    /// Numeric App Store id. Opaque to the pipeline.
    #[serde(default)]
    pub app_id: String,
    #[serde(default = "default_country")]
    pub country: String,
}

impl Default for AppStoreConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            country: default_country(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Max records requested per platform.
    #[serde(default = "default_review_count")]
    pub review_count: usize,
    /// Trailing window size in days.
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default)]
    pub play_store: PlayStoreConfig,
    #[serde(default)]
    pub app_store: AppStoreConfig,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Replacement intent lexicon (JSON or TOML).
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            review_count: default_review_count(),
            days: default_days(),
            play_store: PlayStoreConfig::default(),
            app_store: AppStoreConfig::default(),
            output_dir: default_output_dir(),
            http_timeout_secs: default_http_timeout_secs(),
            lexicon_path: None,
        }
    }
}

impl PipelineConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.review_count == 0 {
            bail!("review_count must be positive");
        }
        if self.days == 0 {
            bail!("days must be positive");
        }
        Ok(())
    }

    /// Apply env overrides from an arbitrary lookup (tests pass a closure).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_REVIEW_COUNT) {
            self.review_count = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_REVIEW_COUNT}={v:?} is not a positive integer"))?;
        }
        if let Some(v) = lookup(ENV_DAYS) {
            self.days = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_DAYS}={v:?} is not a positive integer"))?;
        }
        if let Some(v) = lookup(ENV_PLAYSTORE_PACKAGE) {
            self.play_store.package = v.trim().to_string();
        }
        if let Some(v) = lookup(ENV_APPSTORE_APP_ID) {
            self.app_store.app_id = v.trim().to_string();
        }
        if let Some(v) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(v.trim());
        }
        Ok(())
    }
}

/// Load from an explicit path. Supports TOML or JSON formats.
pub fn load_config_from(path: &Path) -> Result<PipelineConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str()).with_context(|| format!("parsing {}", path.display()))
}

/// Load using env var + fallbacks, apply env overrides, validate.
pub fn load_config_default() -> Result<PipelineConfig> {
    let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        load_config_from(&pb)?
    } else {
        let toml_p = PathBuf::from("config/mapp.toml");
        let json_p = PathBuf::from("config/mapp.json");
        if toml_p.exists() {
            load_config_from(&toml_p)?
        } else if json_p.exists() {
            load_config_from(&json_p)?
        } else {
            PipelineConfig::default()
        }
    };

    cfg.apply_overrides(|k| std::env::var(k).ok())?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse_config(s: &str, hint_ext: &str) -> Result<PipelineConfig> {
    match hint_ext {
        "toml" => toml::from_str(s).map_err(|e| anyhow!("invalid toml config: {e}")),
        "json" => serde_json::from_str(s).map_err(|e| anyhow!("invalid json config: {e}")),
        _ => toml::from_str::<PipelineConfig>(s)
            .or_else(|_| serde_json::from_str(s))
            .map_err(|_| anyhow!("unsupported config format")),
    }
}
