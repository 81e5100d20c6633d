//! Publisher implementations.

pub mod log;

pub use log::TracingPublisher;

pub use crate::traits::publisher::{publish_losses_guarded, publish_summary_guarded, Publisher};
