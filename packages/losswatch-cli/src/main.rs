//! Loss tracker CLI
//!
//! Runs one tracking cycle against the persisted baseline, or publishes a
//! summary of the losses that appeared since a past date.

mod config;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use clap::Parser;
use losswatch::{
    compare_against_date, reference_dates, run_periodic_summaries, track_against_baseline,
    DocumentSource, FileStore, HttpSource, Publisher, Summary, TrackerConfig, TrackerError,
    TracingPublisher,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayback_client::WaybackClient;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "losswatch")]
#[command(about = "Track newly reported equipment losses")]
struct Cli {
    /// Publish a summary of losses going back N days, then archive the live pages
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), conflicts_with = "since")]
    delta_days: Option<u32>,

    /// Publish a summary of losses since a fixed date (YYYY-MM-DD)
    #[arg(long)]
    since: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,losswatch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let source = HttpSource::new().context("Failed to build HTTP client")?;
    let publisher = TracingPublisher::new();
    let today = Utc::now().date_naive();

    match (cli.delta_days, cli.since) {
        (Some(days), _) => {
            let from = today - Duration::days(i64::from(days));
            if let Err(e) = publish_summary(&config.tracker, &source, &publisher, from).await {
                tracing::error!(error = %e, from = %from, "Failed to process diff");
            }
            archive_sources(&config.tracker).await;
        }
        (None, Some(from)) => {
            publish_summary(&config.tracker, &source, &publisher, from)
                .await
                .with_context(|| format!("Failed to summarize losses since {from}"))?;
        }
        (None, None) => {
            let store = FileStore::new(&config.store_dir);
            let result = track_against_baseline(&config.tracker, &source, &store, &publisher)
                .await
                .context("Tracking cycle failed")?;

            for (country, count) in &result.counts_by_country {
                tracing::info!(country = %country, records = count, new = result.new_for(country), "Tracked");
            }

            if result.has_new_losses() {
                let dates = reference_dates(&config.tracker, today);
                run_periodic_summaries(&config.tracker, &source, &publisher, &dates).await;
            }
        }
    }

    Ok(())
}

/// Compare against `from` and publish the summary if it has any losses,
/// failing if publishing fails.
async fn publish_summary<S, P>(
    tracker: &TrackerConfig,
    source: &S,
    publisher: &P,
    from: NaiveDate,
) -> Result<Summary, TrackerError>
where
    S: DocumentSource + ?Sized,
    P: Publisher + ?Sized,
{
    let summary = compare_against_date(tracker, source, from).await?.summary();
    if summary.is_empty() {
        tracing::info!(from = %from, "No losses since snapshot, nothing to publish");
        return Ok(summary);
    }
    publisher.publish_summary(&summary).await?;
    Ok(summary)
}

/// Ask the web archive to capture every tracked page. Failures are logged.
async fn archive_sources(tracker: &TrackerConfig) {
    let archive = WaybackClient::new();

    for spec in &tracker.sources {
        match archive.save(&spec.url).await {
            Ok(saved) => tracing::info!(url = %spec.url, saved = %saved, "Archived page"),
            Err(e) => tracing::warn!(url = %spec.url, error = %e, "Failed to archive page"),
        }
    }
}
