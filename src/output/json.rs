//! JSON summary output writer.
//!
//! Writes StatsSummary structs to JSON files with proper formatting.

use super::prepare_path;
use crate::aggregator::{Buckets, StatsAggregator};
use crate::parser::schema::{BucketEntry, StatsSummary};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Build the JSON summary of an aggregator
///
/// **Public** - both sections are capped at the aggregator's group limit
pub fn to_summary(aggregator: &StatsAggregator) -> StatsSummary {
    StatsSummary {
        version: SCHEMA_VERSION.to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        total_time: aggregator.total_time(),
        record_count: aggregator.record_count(),
        by_location: bucket_entries(aggregator, aggregator.time_by_location()),
        by_group: bucket_entries(aggregator, aggregator.time_by_group()),
    }
}

/// **Private** - ranked, truncated bucket list
fn bucket_entries(aggregator: &StatsAggregator, buckets: &Buckets) -> Vec<BucketEntry> {
    buckets
        .ranked()
        .into_iter()
        .take(aggregator.group_limit())
        .map(|(name, time)| BucketEntry {
            name: name.to_string(),
            time,
            percentage: aggregator.percent(time),
        })
        .collect()
}

/// Write a summary to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_summary(
    summary: &StatsSummary,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing summary to: {}", output_path.display());

    prepare_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, summary).map_err(OutputError::SerializationFailed)?;

    info!("Summary written successfully");

    Ok(())
}

/// Read a summary from a JSON file
///
/// **Public** - used by the validate command
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
/// * `OutputError::UnsupportedVersion` - Schema major version differs
pub fn read_summary(input_path: impl AsRef<Path>) -> Result<StatsSummary, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading summary from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;

    let summary: StatsSummary =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    if major_version(&summary.version) != major_version(SCHEMA_VERSION) {
        return Err(OutputError::UnsupportedVersion(summary.version));
    }

    debug!(
        "Summary loaded: version {}, {} records",
        summary.version, summary.record_count
    );

    Ok(summary)
}

fn major_version(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}
