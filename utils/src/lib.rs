//! Shared utilities for the Lodge workspace.

pub mod logging;
pub mod stats;

pub use stats::StatsCounter;
