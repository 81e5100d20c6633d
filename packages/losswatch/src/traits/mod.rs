//! Core trait abstractions.
//!
//! These traits define the collaborator boundaries: where documents come
//! from, where baselines are kept, and where results are announced.

pub mod publisher;
pub mod source;
pub mod store;
