//! Output JSON schema definitions for aggregated stats.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use serde::{Deserialize, Serialize};

/// Top-level summary structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the summary was generated
    pub generated_at: String,

    /// Sum of all record times, in seconds
    pub total_time: f64,

    /// Number of records that contributed to the totals
    pub record_count: usize,

    /// Top buckets keyed by exact location
    pub by_location: Vec<BucketEntry>,

    /// Top buckets keyed by derived group
    pub by_group: Vec<BucketEntry>,
}

/// One aggregated bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketEntry {
    /// Location or group label
    pub name: String,

    /// Accumulated time, in seconds
    pub time: f64,

    /// Share of the total time (0-100)
    pub percentage: f64,
}
