//! Baseline store trait.
//!
//! A store keeps the last extraction per country under a key, plus the
//! delta files written by cycles that found new losses.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::baseline::Baseline;
use crate::types::loss::CountryLoss;

/// Persistence for baselines and deltas.
#[async_trait]
pub trait BaselineStore: Send + Sync {
    /// Read the baseline under `key`.
    ///
    /// A missing key is not an error: it reads as an empty baseline.
    async fn read_baseline(&self, key: &str) -> StoreResult<Baseline>;

    /// Overwrite the baseline under `key` with one payload.
    async fn write_baseline(&self, key: &str, baseline: &Baseline) -> StoreResult<()>;

    /// Write the losses found by one cycle under `key`.
    async fn write_delta(&self, key: &str, losses: &[CountryLoss]) -> StoreResult<()>;

    /// Store name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
