//! Tracking and comparison cycles.
//!
//! - Baseline tracking (fetch → extract → diff → delta → publish → persist)
//! - Point-in-time comparison against archived snapshots
//! - Periodic summaries built on point-in-time comparisons

pub mod compare;
pub mod track;

pub use compare::{compare_against_date, reference_dates, run_periodic_summaries, DateComparison};
pub use track::{track_against_baseline, TrackResult};
