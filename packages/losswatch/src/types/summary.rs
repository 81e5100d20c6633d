//! Display model for a point-in-time comparison.

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::loss::CountryLoss;
use crate::diff::group_stable;

/// Grouped, human-readable view of the losses that appeared between two
/// points in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,

    /// `Losses for {interval} between {since} and {until}`
    pub headline: String,

    /// One `{Country} losses: {n}` line per country, in first-seen order.
    pub totals: Vec<String>,

    /// Per-country rows like `T-72B3 total: 3, destroyed: 2, captured: 1`.
    pub rows: IndexMap<String, Vec<String>>,
}

impl Summary {
    /// Build a summary of `losses` covering `since..until`.
    ///
    /// Grouping by country, then type, then status is stable and by
    /// adjacency, so the counts follow the order losses were discovered.
    pub fn build(losses: &[CountryLoss], since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        let mut rows: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut counts: IndexMap<String, usize> = IndexMap::new();

        for (country, entries) in group_stable(losses, |entry| entry.country().to_string()) {
            *counts.entry(country.clone()).or_default() += entries.len();
            let country_rows = rows.entry(country).or_default();

            for (kind, by_kind) in group_stable(entries, |entry| entry.loss().kind.clone()) {
                let mut parts = vec![format!("{} total: {}", kind, by_kind.len())];
                for (status, by_status) in group_stable(by_kind, |entry| entry.loss().status) {
                    parts.push(format!("{}: {}", status, by_status.len()));
                }
                country_rows.push(parts.join(", "));
            }
        }

        let headline = format!(
            "Losses for {} between {} and {}",
            format_interval(until - since),
            since.format("%Y-%m-%dT%H:%M:%S"),
            until.format("%Y-%m-%dT%H:%M:%S"),
        );
        let totals = counts
            .iter()
            .map(|(country, n)| format!("{} losses: {}", capitalize(country), n))
            .collect();

        Self {
            since,
            until,
            headline,
            totals,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Side-by-side table: one column per country, rows sorted by name,
    /// shorter columns padded with empty cells.
    pub fn table(&self) -> Vec<Vec<String>> {
        let columns: Vec<Vec<String>> = self
            .rows
            .values()
            .map(|rows| {
                let mut sorted = rows.clone();
                sorted.sort();
                sorted
            })
            .collect();
        let height = columns.iter().map(Vec::len).max().unwrap_or(0);

        (0..height)
            .map(|i| {
                columns
                    .iter()
                    .map(|column| column.get(i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    /// Plain-text rendering: headline, totals, then the table.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.headline.clone(), self.totals.join(" | ")];
        lines.extend(self.table().into_iter().map(|row| row.join(" | ")));
        lines
    }
}

/// `1 day, 3:04:05` style interval, whole seconds only.
fn format_interval(interval: Duration) -> String {
    let total = interval.num_seconds().max(0);
    let days = total / 86_400;
    let rem = total % 86_400;
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);

    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
