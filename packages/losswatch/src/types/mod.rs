//! Domain types for loss tracking.

pub mod baseline;
pub mod config;
pub mod loss;
pub mod summary;
