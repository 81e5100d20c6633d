//! Minimal web archive client.
//!
//! Supports the availability lookup (closest capture to a date), downloading
//! a capture, and asking the archive to save a page now.
//!
//! # Example
//!
//! ```rust,ignore
//! use wayback_client::WaybackClient;
//!
//! let client = WaybackClient::new();
//! let snapshot = client.closest("https://example.com/", date).await?;
//! let body = client.download(&snapshot.url).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{Result, WaybackError};
pub use types::{AvailabilityResponse, ClosestSnapshot};

use chrono::NaiveDate;

const AVAILABILITY_URL: &str = "https://archive.org/wayback/available";
const SAVE_URL: &str = "https://web.archive.org/save";

#[derive(Debug, Clone)]
pub struct WaybackClient {
    client: reqwest::Client,
    availability_url: String,
    save_url: String,
}

impl Default for WaybackClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WaybackClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Reuse an existing HTTP client (user agent, timeouts).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            availability_url: AVAILABILITY_URL.to_string(),
            save_url: SAVE_URL.to_string(),
        }
    }

    /// Point the client at a different archive deployment.
    pub fn with_endpoints(mut self, availability_url: impl Into<String>, save_url: impl Into<String>) -> Self {
        self.availability_url = availability_url.into();
        self.save_url = save_url.into();
        self
    }

    /// Raw availability lookup for `url` around `date`.
    pub async fn availability(&self, url: &str, date: NaiveDate) -> Result<AvailabilityResponse> {
        let timestamp = date.format("%Y%m%d").to_string();
        let resp = self
            .client
            .get(&self.availability_url)
            .query(&[("url", url), ("timestamp", timestamp.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WaybackError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    /// Closest capture of `url` to `date` that was retrieved successfully.
    pub async fn closest(&self, url: &str, date: NaiveDate) -> Result<ClosestSnapshot> {
        let availability = self.availability(url, date).await?;
        match availability.archived_snapshots.closest {
            Some(snapshot) if snapshot.is_ok() => {
                tracing::debug!(url, %date, snapshot = %snapshot.url, "Resolved archived snapshot");
                Ok(snapshot)
            }
            Some(snapshot) => Err(WaybackError::NoSnapshot {
                url: url.to_string(),
                detail: format!("closest capture has status {}", snapshot.status),
            }),
            None => Err(WaybackError::NoSnapshot {
                url: url.to_string(),
                detail: "no captures".to_string(),
            }),
        }
    }

    /// Download a capture (or any URL) as raw bytes.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WaybackError::Api {
                status: status.as_u16(),
                message: format!("downloading {url}"),
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }

    /// Ask the archive to capture `url` now. Returns the capture URL.
    pub async fn save(&self, url: &str) -> Result<String> {
        let endpoint = format!("{}/{}", self.save_url.trim_end_matches('/'), url);
        let resp = self.client.get(&endpoint).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WaybackError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let saved = resp.url().to_string();
        tracing::info!(url, saved = %saved, "Saved page to archive");
        Ok(saved)
    }
}
