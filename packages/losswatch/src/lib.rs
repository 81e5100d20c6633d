//! Equipment-Loss Tracking Library
//!
//! Scrapes public loss-list pages into normalized [`Loss`] records and
//! reports the records that are new compared to an earlier state: either the
//! baseline persisted by the previous run, or an archived snapshot of the
//! same page at a past date.
//!
//! # Usage
//!
//! ```rust,ignore
//! use losswatch::{track_against_baseline, FileStore, HttpSource, TrackerConfig, TracingPublisher};
//!
//! let config = TrackerConfig::default();
//! let source = HttpSource::new()?;
//! let store = FileStore::new("./data");
//!
//! let result = track_against_baseline(&config, &source, &store, &TracingPublisher::new()).await?;
//! println!("{} new losses", result.new_losses.len());
//! ```
//!
//! # Modules
//!
//! - [`extract`] - HTML extraction engine
//! - [`diff`] - Set difference over loss collections
//! - [`traits`] - Seams: document source, baseline store, publisher
//! - [`sources`] - Live/archived page sources
//! - [`stores`] - Baseline storage implementations
//! - [`publishers`] - Publisher implementations
//! - [`pipeline`] - Tracking and comparison cycles
//! - [`testing`] - Mock implementations for testing

pub mod diff;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod publishers;
pub mod sources;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ExtractError, PublishError, SourceError, StoreError, TrackerError};
pub use traits::{
    publisher::{publish_losses_guarded, publish_summary_guarded, Publisher},
    source::{resolve_snapshot, Document, DocumentSource},
    store::BaselineStore,
};
pub use types::{
    baseline::Baseline,
    config::{SourceSpec, TrackerConfig, RUSSIAN_LOSSES_URL, UKRAINIAN_LOSSES_URL},
    loss::{CountryLoss, Loss, Status},
    summary::Summary,
};

pub use diff::{diff_by_country, diff_losses, group_stable};
pub use extract::{collect_losses, parse_losses, Losses};
pub use pipeline::{
    compare_against_date, reference_dates, run_periodic_summaries, track_against_baseline,
    DateComparison, TrackResult,
};
pub use publishers::TracingPublisher;
pub use sources::{HttpSource, MockSource};
pub use stores::{FileStore, MemoryStore};
