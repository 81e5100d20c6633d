//! HTTP-based document source.
//!
//! Live documents come straight from the tracked page; historical documents
//! are resolved through the web archive.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use wayback_client::{WaybackClient, WaybackError};

use crate::error::{SourceError, SourceResult};
use crate::traits::source::{Document, DocumentSource};

/// Fetches pages over HTTP and snapshots through the web archive.
///
/// # Example
///
/// ```rust,ignore
/// use losswatch::sources::HttpSource;
///
/// let source = HttpSource::new()?;
/// let doc = source.fetch("https://example.com/losses.html").await?;
/// ```
pub struct HttpSource {
    client: reqwest::Client,
    archive: WaybackClient,
}

impl HttpSource {
    /// Create a source with a default client.
    ///
    /// No timeout is configured beyond the transport default.
    pub fn new() -> SourceResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("losswatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::http("client", e))?;

        Ok(Self::with_client(client))
    }

    /// Use a preconfigured HTTP client for both live and archive requests.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            archive: WaybackClient::with_client(client.clone()),
            client,
        }
    }

    /// Replace the archive client (e.g. to target another deployment).
    pub fn with_archive(mut self, archive: WaybackClient) -> Self {
        self.archive = archive;
        self
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, url: &str) -> SourceResult<Document> {
        debug!(url = %url, "HTTP fetch starting");
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            SourceError::http(url, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::http(url, format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::http(url, e))?;

        debug!(url = %url, content_length = body.len(), "Page fetched successfully");
        Ok(Document::new(url, body).with_retrieved_at(Utc::now()))
    }

    async fn fetch_as_of(&self, url: &str, date: NaiveDate) -> SourceResult<Document> {
        let snapshot = self.archive.closest(url, date).await.map_err(|e| match e {
            WaybackError::NoSnapshot { detail, .. } => SourceError::ArchiveUnavailable {
                url: url.to_string(),
                date,
                detail,
            },
            other => SourceError::http(url, other),
        })?;

        let captured_at = snapshot
            .captured_at()
            .map_err(|e| SourceError::ArchiveUnavailable {
                url: url.to_string(),
                date,
                detail: e.to_string(),
            })?;

        let body = self
            .archive
            .download(&snapshot.url)
            .await
            .map_err(|e| SourceError::http(&snapshot.url, e))?;

        info!(
            url = %url,
            requested = %date,
            captured_at = %captured_at,
            content_length = body.len(),
            "Archived snapshot fetched"
        );

        Ok(Document::new(url, body).with_retrieved_at(captured_at))
    }

    fn name(&self) -> &str {
        "http"
    }
}
