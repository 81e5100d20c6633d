//! Typed errors for the loss tracker.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell a
//! transport fault from an archive miss or an extraction fault.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort a tracking or comparison cycle.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A document could not be fetched or resolved
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Baseline store unreachable or payload unreadable
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A candidate in a fetched document could not be extracted
    #[error("extraction error in {url}: {source}")]
    Extract {
        url: String,
        #[source]
        source: ExtractError,
    },

    /// Publishing failed where the caller asked for it to be fatal
    #[error("publish error: {0}")]
    Publish(#[from] PublishError),
}

/// Errors raised while obtaining a document.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network failure or non-success response
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No archived copy with a successful retrieval status
    #[error("no archived snapshot of {url} at {date}: {detail}")]
    ArchiveUnavailable {
        url: String,
        date: NaiveDate,
        detail: String,
    },

    /// No canned document (mock sources)
    #[error("document not found: {url}")]
    NotFound { url: String },
}

impl SourceError {
    pub fn http(url: impl Into<String>, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Http {
            url: url.into(),
            source: source.into(),
        }
    }
}

/// Errors raised by a baseline store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage I/O failed
    #[error("storage I/O error for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored payload is not a valid baseline
    #[error("malformed payload for {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Backend-specific failure
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Hard per-candidate extraction faults.
///
/// A malformed caption is not an error (the candidate is skipped); these are
/// the cases that must propagate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The parenthesized caption names none of the known statuses
    #[error("no recognizable status in caption {caption:?}")]
    UnknownStatus { caption: String },

    /// The candidate hyperlink has no target attribute
    #[error("hyperlink {caption:?} has no href")]
    MissingHref { caption: String },
}

/// Publish failures. Always caught at the publishing boundary.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish failed: {0}")]
    Failed(String),

    #[error("publisher backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for cycle operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Result type alias for document sources.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Result type alias for baseline stores.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for publishers.
pub type PublishResult<T> = std::result::Result<T, PublishError>;
