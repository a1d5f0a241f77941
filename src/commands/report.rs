//! Report command implementation.
//!
//! The report command:
//! 1. Reads the stats table
//! 2. Sorts, parses and aggregates it
//! 3. Renders the HTML report
//! 4. Builds the JSON summary and flame chart (if requested)
//! 5. Writes output files

use super::models::ReportArgs;
use crate::aggregator::StatsAggregator;
use crate::flamegraph::generate_flamegraph;
use crate::output::{to_summary, write_report, write_summary, write_svg};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Read;
use std::time::Instant;

/// Largest accepted summary/raw limit
const MAX_RECORDS: usize = 10_000;

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable input
/// * Invalid grouping configuration
/// * File write errors
pub fn execute_report(args: ReportArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Building report from: {}", args.input.display());

    // Step 1: Read input
    info!("Step 1/4: Reading stats table...");
    let raw_text = read_input(&args).context("Failed to read stats input")?;

    // Step 2: Aggregate
    info!("Step 2/4: Aggregating records (sorted by {})...", args.config.sort_by);
    let aggregator = StatsAggregator::from_config(&raw_text, &args.config)
        .context("Invalid report configuration")?;

    debug!(
        "Aggregated {} records into {} locations and {} groups",
        aggregator.record_count(),
        aggregator.time_by_location().len(),
        aggregator.time_by_group().len()
    );

    // Step 3: HTML report
    if let Some(path) = &args.output_html {
        info!("Step 3/4: Writing HTML report...");
        write_report(&aggregator.render(), path).context("Failed to write HTML report")?;
        info!("✓ Report written to: {}", path.display());
    } else {
        info!("Step 3/4: Skipping HTML report (not requested)");
    }

    // Step 4: Summary and flame chart
    info!("Step 4/4: Writing extra outputs...");
    if let Some(path) = &args.output_json {
        write_summary(&to_summary(&aggregator), path).context("Failed to write JSON summary")?;
        info!("✓ Summary written to: {}", path.display());
    }

    if let Some(path) = &args.output_svg {
        let svg = generate_flamegraph(&aggregator, args.flamegraph_config.as_ref())
            .context("Failed to generate flamegraph")?;
        write_svg(&svg, path).context("Failed to write flamegraph SVG")?;
        info!("✓ Flamegraph written to: {}", path.display());
    }

    if args.print_text || args.has_no_outputs() {
        println!("{}", aggregator.report_text());
    }

    let elapsed = start_time.elapsed();
    info!("Report completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// **Private** - file or stdin
fn read_input(args: &ReportArgs) -> Result<String> {
    if args.reads_stdin() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }

    std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.reads_stdin() && !args.input.is_file() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    if args.config.group_records == 0 {
        anyhow::bail!("group_records must be greater than 0");
    }

    if args.config.raw_records == 0 {
        anyhow::bail!("raw_records must be greater than 0");
    }

    if args.config.group_records > MAX_RECORDS || args.config.raw_records > MAX_RECORDS {
        anyhow::bail!("record limits are too large (max {})", MAX_RECORDS);
    }

    args.config.validate()?;

    Ok(())
}
