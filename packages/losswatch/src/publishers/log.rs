//! Publisher that writes announcements to the tracing log.

use async_trait::async_trait;
use tracing::info;

use crate::error::PublishResult;
use crate::traits::publisher::Publisher;
use crate::types::loss::CountryLoss;
use crate::types::summary::Summary;

/// Announces losses and summaries as `info` events.
///
/// This is the default publisher of the CLI. Posting to a social network or
/// rendering summary images is left to other `Publisher` implementations.
#[derive(Debug, Clone, Default)]
pub struct TracingPublisher {
    target: Option<String>,
}

impl TracingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every event with a channel label.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.target = Some(channel.into());
        self
    }

    fn channel(&self) -> &str {
        self.target.as_deref().unwrap_or("log")
    }
}

#[async_trait]
impl Publisher for TracingPublisher {
    async fn publish_losses(&self, losses: &[CountryLoss]) -> PublishResult<()> {
        for loss in losses {
            info!(channel = self.channel(), "{}", loss);
        }
        info!(channel = self.channel(), count = losses.len(), "Published new losses");
        Ok(())
    }

    async fn publish_summary(&self, summary: &Summary) -> PublishResult<()> {
        for line in summary.lines() {
            info!(channel = self.channel(), "{}", line);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "tracing"
    }
}
