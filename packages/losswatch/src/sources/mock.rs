//! Mock document source for testing.
//!
//! Provides canned live pages and archived snapshots per URL.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::error::{SourceError, SourceResult};
use crate::traits::source::{Document, DocumentSource};

/// A recorded request against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    Fetch { url: String },
    FetchAsOf { url: String, date: NaiveDate },
}

/// Mock source with canned responses.
///
/// # Example
///
/// ```rust
/// use losswatch::sources::MockSource;
///
/// let source = MockSource::new().with_page("https://example.com/", "<ul></ul>");
/// ```
#[derive(Default, Clone)]
pub struct MockSource {
    pages: Arc<RwLock<HashMap<String, Bytes>>>,
    snapshots: Arc<RwLock<HashMap<(String, NaiveDate), (Bytes, DateTime<Utc>)>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    calls: Arc<RwLock<Vec<SourceCall>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` as the live version of `url`.
    pub fn add_page(&self, url: impl Into<String>, body: impl Into<Bytes>) {
        self.pages.write().unwrap().insert(url.into(), body.into());
    }

    /// Serve `body` as the archived version of `url` at `date`, captured at
    /// `captured_at`.
    pub fn add_snapshot(
        &self,
        url: impl Into<String>,
        date: NaiveDate,
        body: impl Into<Bytes>,
        captured_at: DateTime<Utc>,
    ) {
        self.snapshots
            .write()
            .unwrap()
            .insert((url.into(), date), (body.into(), captured_at));
    }

    /// Make every request for `url` fail with a transport error.
    pub fn fail_url(&self, url: impl Into<String>) {
        self.failing.write().unwrap().insert(url.into());
    }

    pub fn with_page(self, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.add_page(url, body);
        self
    }

    pub fn with_snapshot(
        self,
        url: impl Into<String>,
        date: NaiveDate,
        body: impl Into<Bytes>,
        captured_at: DateTime<Utc>,
    ) -> Self {
        self.add_snapshot(url, date, body, captured_at);
        self
    }

    pub fn with_failure(self, url: impl Into<String>) -> Self {
        self.fail_url(url);
        self
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    fn check_failure(&self, url: &str) -> SourceResult<()> {
        if self.failing.read().unwrap().contains(url) {
            return Err(SourceError::http(url, "connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentSource for MockSource {
    async fn fetch(&self, url: &str) -> SourceResult<Document> {
        self.calls.write().unwrap().push(SourceCall::Fetch {
            url: url.to_string(),
        });
        self.check_failure(url)?;

        let body = self
            .pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                url: url.to_string(),
            })?;

        Ok(Document::new(url, body))
    }

    async fn fetch_as_of(&self, url: &str, date: NaiveDate) -> SourceResult<Document> {
        self.calls.write().unwrap().push(SourceCall::FetchAsOf {
            url: url.to_string(),
            date,
        });
        self.check_failure(url)?;

        let (body, captured_at) = self
            .snapshots
            .read()
            .unwrap()
            .get(&(url.to_string(), date))
            .cloned()
            .ok_or_else(|| SourceError::ArchiveUnavailable {
                url: url.to_string(),
                date,
                detail: "no captures".to_string(),
            })?;

        Ok(Document::new(url, body).with_retrieved_at(captured_at))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::source::resolve_snapshot;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_live_and_archived() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let captured = Utc.with_ymd_and_hms(2023, 5, 6, 11, 12, 13).unwrap();
        let source = MockSource::new()
            .with_page("http://test", "now")
            .with_snapshot("http://test", date, "then", captured);

        let live = resolve_snapshot(&source, "http://test", None).await.unwrap();
        assert_eq!(&live.body[..], b"now");

        let old = resolve_snapshot(&source, "http://test", Some(date)).await.unwrap();
        assert_eq!(&old.body[..], b"then");
        assert_eq!(old.retrieved_at, captured);

        assert_eq!(
            source.calls(),
            vec![
                SourceCall::Fetch { url: "http://test".into() },
                SourceCall::FetchAsOf { url: "http://test".into(), date },
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_snapshot_fails_loudly() {
        let source = MockSource::new().with_page("http://test", "now");
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();

        let err = source.fetch_as_of("http://test", date).await.unwrap_err();
        assert!(matches!(err, SourceError::ArchiveUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_configured_failure() {
        let source = MockSource::new()
            .with_page("http://test", "now")
            .with_failure("http://test");

        let err = source.fetch("http://test").await.unwrap_err();
        assert!(matches!(err, SourceError::Http { .. }));
    }
}
