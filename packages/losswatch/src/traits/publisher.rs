//! Publisher trait: where newly found losses and summaries are announced.
//!
//! Publishing is best effort. Cycles call [`publish_losses_guarded`] and
//! [`publish_summary_guarded`], which log failures instead of returning them,
//! so a failing publisher can never block or corrupt baseline persistence.

use async_trait::async_trait;
use tracing::error;

use crate::error::PublishResult;
use crate::types::loss::CountryLoss;
use crate::types::summary::Summary;

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Announce newly found losses, in discovery order.
    async fn publish_losses(&self, losses: &[CountryLoss]) -> PublishResult<()>;

    /// Announce a point-in-time summary.
    async fn publish_summary(&self, summary: &Summary) -> PublishResult<()>;

    /// Publisher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Publish losses, logging any failure. Returns whether publishing succeeded.
pub async fn publish_losses_guarded<P>(publisher: &P, losses: &[CountryLoss]) -> bool
where
    P: Publisher + ?Sized,
{
    match publisher.publish_losses(losses).await {
        Ok(()) => true,
        Err(e) => {
            error!(publisher = publisher.name(), count = losses.len(), error = %e, "Failed to publish losses");
            false
        }
    }
}

/// Publish a summary, logging any failure. Returns whether publishing succeeded.
pub async fn publish_summary_guarded<P>(publisher: &P, summary: &Summary) -> bool
where
    P: Publisher + ?Sized,
{
    match publisher.publish_summary(summary).await {
        Ok(()) => true,
        Err(e) => {
            error!(publisher = publisher.name(), headline = %summary.headline, error = %e, "Failed to publish summary");
            false
        }
    }
}
