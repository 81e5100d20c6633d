//! Document source trait: where loss pages come from.
//!
//! A source returns the raw bytes of a page either as it is now or as it
//! was archived at (or shortly after) a calendar date.
//!
//! # Usage
//!
//! ```rust,ignore
//! use losswatch::traits::source::{resolve_snapshot, DocumentSource};
//!
//! let live = source.fetch("https://example.com/losses.html").await?;
//! let last_week = resolve_snapshot(&source, url, Some(date)).await?;
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::SourceResult;

/// Raw page content plus the moment it represents.
#[derive(Debug, Clone)]
pub struct Document {
    /// URL the document was requested for
    pub url: String,

    /// Undecoded response body
    pub body: Bytes,

    /// Fetch time for live documents, archive capture time for snapshots
    pub retrieved_at: DateTime<Utc>,
}

impl Document {
    pub fn new(url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            retrieved_at: Utc::now(),
        }
    }

    pub fn with_retrieved_at(mut self, retrieved_at: DateTime<Utc>) -> Self {
        self.retrieved_at = retrieved_at;
        self
    }
}

/// Pluggable provider of loss pages.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the live document.
    async fn fetch(&self, url: &str) -> SourceResult<Document>;

    /// Fetch the archived document closest to `date`.
    ///
    /// Must fail with `SourceError::ArchiveUnavailable` when no archived copy
    /// with a successful retrieval status exists.
    async fn fetch_as_of(&self, url: &str, date: NaiveDate) -> SourceResult<Document>;

    /// Source name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Obtain `url` as of `date`, or live when `date` is `None`.
pub async fn resolve_snapshot<S>(source: &S, url: &str, date: Option<NaiveDate>) -> SourceResult<Document>
where
    S: DocumentSource + ?Sized,
{
    match date {
        None => source.fetch(url).await,
        Some(date) => source.fetch_as_of(url, date).await,
    }
}
