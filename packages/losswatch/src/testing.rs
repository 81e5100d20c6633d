//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the tracker without
//! network access or a real publishing channel.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::error::{PublishError, PublishResult};
use crate::traits::publisher::Publisher;
use crate::types::loss::CountryLoss;
use crate::types::summary::Summary;

pub use crate::sources::{MockSource, SourceCall};
pub use crate::stores::MemoryStore;

/// A mock publisher that records everything it is handed.
#[derive(Default, Clone)]
pub struct MockPublisher {
    losses: Arc<RwLock<Vec<Vec<CountryLoss>>>>,
    summaries: Arc<RwLock<Vec<Summary>>>,
    summary_attempts: Arc<RwLock<usize>>,
    fail_losses: bool,
    fail_summaries: bool,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every batch of losses.
    pub fn failing_losses(mut self) -> Self {
        self.fail_losses = true;
        self
    }

    /// Reject every summary.
    pub fn failing_summaries(mut self) -> Self {
        self.fail_summaries = true;
        self
    }

    /// All accepted losses, flattened in publish order.
    pub fn published_losses(&self) -> Vec<CountryLoss> {
        self.losses.read().unwrap().iter().flatten().cloned().collect()
    }

    /// Number of accepted loss batches.
    pub fn loss_batches(&self) -> usize {
        self.losses.read().unwrap().len()
    }

    pub fn published_summaries(&self) -> Vec<Summary> {
        self.summaries.read().unwrap().clone()
    }

    /// Summaries handed over, accepted or not.
    pub fn summary_attempts(&self) -> usize {
        *self.summary_attempts.read().unwrap()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn publish_losses(&self, losses: &[CountryLoss]) -> PublishResult<()> {
        if self.fail_losses {
            return Err(PublishError::Failed("mock publisher rejects losses".to_string()));
        }
        self.losses.write().unwrap().push(losses.to_vec());
        Ok(())
    }

    async fn publish_summary(&self, summary: &Summary) -> PublishResult<()> {
        *self.summary_attempts.write().unwrap() += 1;
        if self.fail_summaries {
            return Err(PublishError::Failed("mock publisher rejects summaries".to_string()));
        }
        self.summaries.write().unwrap().push(summary.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Build a loss-list page with one list item per `(type, caption)` entry.
///
/// Each entry links to `http://img.test/{type}-{digits}.jpg`, where `digits`
/// are the digits of its caption.
pub fn loss_page(entries: &[(&str, &str)]) -> String {
    let items: String = entries
        .iter()
        .map(|(kind, caption)| {
            let digits: String = caption.chars().filter(char::is_ascii_digit).collect();
            format!(
                "<li><img src=\"flag.png\"> 1 {kind}: <a href=\"http://img.test/{kind}-{digits}.jpg\">{caption}</a></li>\n"
            )
        })
        .collect();

    format!("<html><body><h3>Tanks</h3><ul>\n{items}</ul></body></html>")
}
