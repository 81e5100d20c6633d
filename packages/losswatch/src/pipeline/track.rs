//! Baseline tracking cycle - fetch, extract, diff, persist.

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::diff::diff_by_country;
use crate::error::{Result, TrackerError};
use crate::extract::collect_losses;
use crate::traits::{
    publisher::{publish_losses_guarded, Publisher},
    source::{Document, DocumentSource},
    store::BaselineStore,
};
use crate::types::{baseline::Baseline, config::TrackerConfig, loss::CountryLoss};

/// Result of one tracking cycle.
#[derive(Debug, Clone, Default)]
pub struct TrackResult {
    /// Losses absent from the previous baseline, in discovery order
    pub new_losses: Vec<CountryLoss>,

    /// Records extracted per country (the size of the new baseline)
    pub counts_by_country: IndexMap<String, usize>,

    /// Key of the delta file, when one was written
    pub delta_key: Option<String>,

    /// Whether the publisher accepted the new losses
    pub published: bool,

    /// Whether the new baseline reached the store
    pub baseline_written: bool,
}

impl TrackResult {
    pub fn has_new_losses(&self) -> bool {
        !self.new_losses.is_empty()
    }

    /// New losses filed under `country`.
    pub fn new_for(&self, country: &str) -> usize {
        self.new_losses.iter().filter(|l| l.country() == country).count()
    }
}

/// Run one tracking cycle against the persisted baseline.
///
/// All pages are fetched concurrently alongside the baseline read; any
/// failure aborts the cycle before anything is written. When new losses
/// exist they are written to a delta file and handed to the publisher. The
/// new baseline is always written last, as one payload.
pub async fn track_against_baseline<S, B, P>(
    config: &TrackerConfig,
    source: &S,
    store: &B,
    publisher: &P,
) -> Result<TrackResult>
where
    S: DocumentSource + ?Sized,
    B: BaselineStore + ?Sized,
    P: Publisher + ?Sized,
{
    let started_at = Utc::now();

    info!(
        sources = config.sources.len(),
        source = source.name(),
        store = store.name(),
        "Starting tracking cycle"
    );

    let fetches = try_join_all(config.sources.iter().map(|spec| source.fetch(&spec.url)));
    let (documents, previous) = tokio::try_join!(
        async { fetches.await.map_err(TrackerError::from) },
        async {
            store
                .read_baseline(&config.baseline_key)
                .await
                .map_err(TrackerError::from)
        },
    )?;

    debug!(countries = previous.countries().count(), records = previous.total(), "Baseline loaded");

    let current = extract_all(config, &documents)?;
    let new_losses = diff_by_country(&previous, current.iter());

    let mut result = TrackResult {
        counts_by_country: current
            .iter()
            .map(|(country, losses)| (country.to_string(), losses.len()))
            .collect(),
        ..Default::default()
    };

    if !new_losses.is_empty() {
        let key = config.delta_key(&delta_stamp(started_at));
        store.write_delta(&key, &new_losses).await?;
        info!(key = %key, count = new_losses.len(), "Delta written");

        result.published = publish_losses_guarded(publisher, &new_losses).await;
        result.delta_key = Some(key);
    }

    store.write_baseline(&config.baseline_key, &current).await?;
    result.baseline_written = true;
    result.new_losses = new_losses;

    info!(
        new_losses = result.new_losses.len(),
        records = current.total(),
        "Tracking cycle complete"
    );

    Ok(result)
}

/// Extract every fetched document into a baseline keyed by country.
///
/// Documents are in `config.sources` order.
pub(crate) fn extract_all(config: &TrackerConfig, documents: &[Document]) -> Result<Baseline> {
    let mut baseline = Baseline::new();

    for (spec, document) in config.sources.iter().zip(documents) {
        let losses = collect_losses(&document.body).map_err(|source| TrackerError::Extract {
            url: document.url.clone(),
            source,
        })?;
        debug!(country = %spec.country, url = %spec.url, records = losses.len(), "Extracted losses");

        // Two pages filed under one country accumulate.
        let mut merged = baseline.get(&spec.country).to_vec();
        merged.extend(losses);
        baseline.insert(spec.country.clone(), merged);
    }

    Ok(baseline)
}

fn delta_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockSource;
    use crate::stores::MemoryStore;
    use crate::testing::{loss_page, MockPublisher};
    use crate::types::loss::{Loss, Status};

    const UA: &str = "http://ua.test/losses";
    const RU: &str = "http://ru.test/losses";

    fn config() -> TrackerConfig {
        TrackerConfig::new(vec![])
            .with_source(UA, "ukrainian")
            .with_source(RU, "russian")
    }

    #[tokio::test]
    async fn test_first_run_reports_everything() {
        let source = MockSource::new()
            .with_page(UA, loss_page(&[("T-64BV", "(1, destroyed)")]))
            .with_page(RU, loss_page(&[("T-72B3", "(2, captured)"), ("BMP-2", "(3, damaged)")]));
        let store = MemoryStore::new();
        let publisher = MockPublisher::new();

        let result = track_against_baseline(&config(), &source, &store, &publisher)
            .await
            .unwrap();

        assert_eq!(result.new_losses.len(), 3);
        assert_eq!(result.new_for("russian"), 2);
        assert_eq!(result.counts_by_country["ukrainian"], 1);
        assert!(result.baseline_written);
        assert!(result.published);

        let writes = store.writes();
        assert_eq!(writes.len(), 2);
        assert!(writes[0].starts_with("oryx/"));
        assert_eq!(writes[1], "oryx/last.json");
        assert_eq!(publisher.published_losses().len(), 3);
    }

    #[tokio::test]
    async fn test_unchanged_page_reports_nothing() {
        let page = loss_page(&[("T-64BV", "(1, destroyed)")]);
        let source = MockSource::new().with_page(UA, page.clone()).with_page(RU, page);
        let store = MemoryStore::new();
        let publisher = MockPublisher::new();

        track_against_baseline(&config(), &source, &store, &publisher).await.unwrap();
        let second = track_against_baseline(&config(), &source, &store, &publisher)
            .await
            .unwrap();

        assert!(!second.has_new_losses());
        assert!(second.delta_key.is_none());
        assert!(second.baseline_written);
        assert_eq!(publisher.loss_batches(), 1);
    }

    #[tokio::test]
    async fn test_unknown_status_aborts_before_persisting() {
        let source = MockSource::new()
            .with_page(UA, loss_page(&[("T-64BV", "(1, destroyed)")]))
            .with_page(RU, loss_page(&[("T-72B3", "(2, spotted)")]));
        let store = MemoryStore::new();

        let err = track_against_baseline(&config(), &source, &store, &MockPublisher::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TrackerError::Extract { ref url, .. } if url == RU));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_shared_country_accumulates() {
        let config = TrackerConfig::new(vec![])
            .with_source(UA, "ukrainian")
            .with_source(RU, "ukrainian");
        let source = MockSource::new()
            .with_page(UA, loss_page(&[("T-64BV", "(1, destroyed)")]))
            .with_page(RU, loss_page(&[("T-80BV", "(2, destroyed)")]));
        let store = MemoryStore::new();

        let result = track_against_baseline(&config, &source, &store, &MockPublisher::new())
            .await
            .unwrap();

        assert_eq!(result.counts_by_country.len(), 1);
        assert_eq!(result.counts_by_country["ukrainian"], 2);
        let baseline = store.read_baseline("oryx/last.json").await.unwrap();
        assert_eq!(
            baseline.get("ukrainian")[1],
            Loss::new("T-80BV", Status::Destroyed, 2, "http://img.test/T-80BV-2.jpg")
        );
    }

    #[test]
    fn test_delta_stamp_format() {
        let at = DateTime::parse_from_rfc3339("2024-03-08T01:02:03.5Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(delta_stamp(at), "2024-03-08T01:02:03.500000");
    }
}
