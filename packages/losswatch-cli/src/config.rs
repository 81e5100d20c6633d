use anyhow::{Context, Result};
use chrono::NaiveDate;
use dotenvy::dotenv;
use losswatch::{SourceSpec, TrackerConfig};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the file store keeps baselines and deltas in
    pub store_dir: PathBuf,
    pub tracker: TrackerConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut tracker = TrackerConfig::default();

        if let Some(path) = var("LOSSWATCH_SOURCES_FILE") {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("LOSSWATCH_SOURCES_FILE {path} must be readable"))?;
            tracker.sources = parse_sources(&raw)
                .with_context(|| format!("LOSSWATCH_SOURCES_FILE {path} must be a JSON list of sources"))?;
        }
        if let Some(key) = var("LOSSWATCH_BASELINE_KEY") {
            tracker = tracker.with_baseline_key(key);
        }
        if let Some(prefix) = var("LOSSWATCH_DELTA_PREFIX") {
            tracker = tracker.with_delta_prefix(prefix);
        }
        if let Some(date) = var("LOSSWATCH_REFERENCE_DATE") {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .context("LOSSWATCH_REFERENCE_DATE must be a YYYY-MM-DD date")?;
            tracker = tracker.with_reference_date(date);
        }

        Ok(Self {
            store_dir: var("LOSSWATCH_STORE_DIR")
                .unwrap_or_else(|| "./data".to_string())
                .into(),
            tracker,
        })
    }
}

/// Parse `[{"url": ..., "country": ...}, ...]`.
fn parse_sources(raw: &str) -> Result<Vec<SourceSpec>> {
    let sources: Vec<SourceSpec> = serde_json::from_str(raw)?;
    anyhow::ensure!(!sources.is_empty(), "at least one source is required");
    Ok(sources)
}
