//! Aggregation of stats records into per-location and per-group totals.
//!
//! This module transforms parsed stats records into:
//! - Group labels (ordered rule chain)
//! - Time buckets by location and by group
//! - The rendered text/HTML report

pub mod grouping;
pub mod stats;

// Re-export main types and functions
pub use grouping::{derive_group, GroupRule, GroupRules};
pub use stats::{Buckets, StatsAggregator};
