//! Stats table parsing and schema definitions.
//!
//! This module handles:
//! - Parsing the profiler's text table into records
//! - Reordering the table by the configured sort keys
//! - Defining output schema

pub mod schema;
pub mod sort;
pub mod stats_text;

// Re-export main types
pub use schema::{BucketEntry, StatsSummary};
pub use sort::{sort_stats_text, SortBy, SortKey};
pub use stats_text::{parse, parse_record, Records, StatRecord};
