//! Document source implementations.
//!
//! - `HttpSource` - live pages over HTTP, history through the web archive
//! - `MockSource` - canned pages and snapshots for testing

mod http;
mod mock;

pub use http::HttpSource;
pub use mock::{MockSource, SourceCall};

// Re-export from traits for convenience
pub use crate::traits::source::{resolve_snapshot, Document, DocumentSource};
