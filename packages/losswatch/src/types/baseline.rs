//! Persisted per-country snapshot of extracted losses.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::loss::Loss;

/// Last known extraction result per country.
///
/// Serialized as one JSON object keyed by country, each value an array of
/// loss records. Country order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Baseline {
    countries: IndexMap<String, Vec<Loss>>,
}

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Losses recorded for `country`; empty if the country was never seen.
    pub fn get(&self, country: &str) -> &[Loss] {
        self.countries
            .get(country)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace the losses for `country` wholesale.
    pub fn insert(&mut self, country: impl Into<String>, losses: Vec<Loss>) {
        self.countries.insert(country.into(), losses);
    }

    /// Builder form of [`Baseline::insert`].
    pub fn with_country(mut self, country: impl Into<String>, losses: Vec<Loss>) -> Self {
        self.insert(country, losses);
        self
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Loss])> {
        self.countries
            .iter()
            .map(|(country, losses)| (country.as_str(), losses.as_slice()))
    }

    /// Total number of records across all countries.
    pub fn total(&self) -> usize {
        self.countries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl FromIterator<(String, Vec<Loss>)> for Baseline {
    fn from_iter<T: IntoIterator<Item = (String, Vec<Loss>)>>(iter: T) -> Self {
        Self {
            countries: iter.into_iter().collect(),
        }
    }
}
