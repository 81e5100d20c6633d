//! Point-in-time comparison and the periodic summaries built on it.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use futures::future::try_join_all;
use tracing::{info, warn};

use crate::diff::diff_by_country;
use crate::error::Result;
use crate::pipeline::track::extract_all;
use crate::traits::{
    publisher::{publish_summary_guarded, Publisher},
    source::{resolve_snapshot, DocumentSource},
};
use crate::types::{config::TrackerConfig, loss::CountryLoss, summary::Summary};

/// Losses that appeared between an archived snapshot and now.
#[derive(Debug, Clone)]
pub struct DateComparison {
    /// Requested comparison date
    pub from: NaiveDate,

    /// Losses present now but absent from the snapshot, in discovery order
    pub losses: Vec<CountryLoss>,

    /// Earliest moment any compared document represents
    pub since: DateTime<Utc>,

    /// Latest moment any compared document represents
    pub until: DateTime<Utc>,
}

impl DateComparison {
    pub fn summary(&self) -> Summary {
        Summary::build(&self.losses, self.since, self.until)
    }
}

/// Compare every tracked page as archived at `from` against its live version.
///
/// All snapshots and live pages are fetched concurrently. A missing
/// snapshot fails the whole comparison. Nothing is persisted.
pub async fn compare_against_date<S>(
    config: &TrackerConfig,
    source: &S,
    from: NaiveDate,
) -> Result<DateComparison>
where
    S: DocumentSource + ?Sized,
{
    info!(from = %from, sources = config.sources.len(), "Comparing against archived snapshot");

    let pairs = try_join_all(config.sources.iter().map(|spec| async move {
        tokio::try_join!(
            resolve_snapshot(source, &spec.url, Some(from)),
            resolve_snapshot(source, &spec.url, None),
        )
    }))
    .await?;

    let (old_documents, new_documents): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();

    let timestamps = old_documents
        .iter()
        .chain(&new_documents)
        .map(|document| document.retrieved_at);
    let since = timestamps.clone().min().unwrap_or_else(Utc::now);
    let until = timestamps.max().unwrap_or(since);

    let previous = extract_all(config, &old_documents)?;
    let current = extract_all(config, &new_documents)?;
    let losses = diff_by_country(&previous, current.iter());

    info!(from = %from, since = %since, new_losses = losses.len(), "Comparison complete");

    Ok(DateComparison {
        from,
        losses,
        since,
        until,
    })
}

/// The dates periodic summaries look back to: one day, one week, and the
/// configured reference date.
pub fn reference_dates(config: &TrackerConfig, today: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = vec![today - Duration::days(1), today - Duration::days(7)];
    dates.push(config.reference_date);
    dates
}

/// Compare against each of `dates` and publish a summary per comparison
/// that found losses.
///
/// A comparison that fails is logged and skipped. Returns the summaries that
/// were produced, in `dates` order.
pub async fn run_periodic_summaries<S, P>(
    config: &TrackerConfig,
    source: &S,
    publisher: &P,
    dates: &[NaiveDate],
) -> Vec<Summary>
where
    S: DocumentSource + ?Sized,
    P: Publisher + ?Sized,
{
    let mut summaries = Vec::with_capacity(dates.len());

    for &from in dates {
        match compare_against_date(config, source, from).await {
            Ok(comparison) => {
                let summary = comparison.summary();
                if summary.is_empty() {
                    info!(from = %from, "No losses since snapshot, nothing to publish");
                } else {
                    publish_summary_guarded(publisher, &summary).await;
                }
                summaries.push(summary);
            }
            Err(e) => {
                warn!(from = %from, error = %e, "Skipping summary");
            }
        }
    }

    summaries
}
