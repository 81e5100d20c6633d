//! Configuration types for tracking cycles.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A tracked page and the country label its losses are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub url: String,
    pub country: String,
}

impl SourceSpec {
    pub fn new(url: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            country: country.into(),
        }
    }
}

/// Configuration passed explicitly into every tracking and comparison cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Pages to scrape, in reporting order.
    pub sources: Vec<SourceSpec>,

    /// Store key of the persisted baseline.
    #[serde(default = "default_baseline_key")]
    pub baseline_key: String,

    /// Store key prefix for per-cycle delta files.
    #[serde(default = "default_delta_prefix")]
    pub delta_key_prefix: String,

    /// Fixed reference date used by the periodic summaries.
    #[serde(default = "default_reference_date")]
    pub reference_date: NaiveDate,
}

pub const UKRAINIAN_LOSSES_URL: &str =
    "https://www.oryxspioenkop.com/2022/02/attack-on-europe-documenting-ukrainian.html";
pub const RUSSIAN_LOSSES_URL: &str =
    "https://www.oryxspioenkop.com/2022/02/attack-on-europe-documenting-equipment.html";

fn default_baseline_key() -> String {
    "oryx/last.json".to_string()
}

fn default_delta_prefix() -> String {
    "oryx".to_string()
}

fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, 5).unwrap_or_default()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                SourceSpec::new(UKRAINIAN_LOSSES_URL, "ukrainian"),
                SourceSpec::new(RUSSIAN_LOSSES_URL, "russian"),
            ],
            baseline_key: default_baseline_key(),
            delta_key_prefix: default_delta_prefix(),
            reference_date: default_reference_date(),
        }
    }
}

impl TrackerConfig {
    /// Create a config tracking exactly `sources`, with default keys.
    pub fn new(sources: Vec<SourceSpec>) -> Self {
        Self {
            sources,
            ..Default::default()
        }
    }

    /// Add a tracked page.
    pub fn with_source(mut self, url: impl Into<String>, country: impl Into<String>) -> Self {
        self.sources.push(SourceSpec::new(url, country));
        self
    }

    pub fn with_baseline_key(mut self, key: impl Into<String>) -> Self {
        self.baseline_key = key.into();
        self
    }

    pub fn with_delta_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.delta_key_prefix = prefix.into();
        self
    }

    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    /// Store key for a delta written at `stamp`.
    pub fn delta_key(&self, stamp: &str) -> String {
        format!("{}/{}.json", self.delta_key_prefix.trim_end_matches('/'), stamp)
    }
}
