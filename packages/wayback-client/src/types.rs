use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::{Result, WaybackError};

/// Response of the availability endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub archived_snapshots: ArchivedSnapshots,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchivedSnapshots {
    pub closest: Option<ClosestSnapshot>,
}

/// The capture nearest to the requested timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct ClosestSnapshot {
    /// HTTP status the archive recorded when capturing, as a string (`"200"`)
    pub status: String,
    #[serde(default)]
    pub available: bool,
    pub url: String,
    /// Capture time as `YYYYMMDDhhmmss`
    pub timestamp: String,
}

impl ClosestSnapshot {
    /// Whether the capture recorded a successful retrieval.
    pub fn is_ok(&self) -> bool {
        self.status == "200"
    }

    /// Capture time, interpreted as UTC.
    pub fn captured_at(&self) -> Result<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y%m%d%H%M%S")
            .map(|naive| naive.and_utc())
            .map_err(|_| WaybackError::BadTimestamp(self.timestamp.clone()))
    }
}
