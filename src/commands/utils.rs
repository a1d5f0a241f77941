use crate::middleware::{ProfileGate, RequestContext};
use crate::output::read_summary;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a summary JSON file
pub fn validate_summary_file(file_path: PathBuf) -> Result<()> {
    println!("Validating summary: {}", file_path.display());

    let summary = read_summary(&file_path)?;

    println!("✓ Valid summary JSON");
    println!("  Version: {}", summary.version);
    println!("  Generated: {}", summary.generated_at);
    println!("  Total Time: {:.3}s", summary.total_time);
    println!("  Records: {}", summary.record_count);
    println!("  Locations: {}", summary.by_location.len());
    println!("  Groups: {}", summary.by_group.len());

    Ok(())
}

/// Print whether a request would get a profiling report
pub fn check_gate(query: String, debug: bool, superuser: bool) -> bool {
    let gate = ProfileGate::new(debug);
    let ctx = RequestContext::new(query).with_superuser(superuser);
    let show = gate.should_show_stats(&ctx);

    println!(
        "Query {:?} (debug: {}, superuser: {}): report {}",
        ctx.query,
        debug,
        superuser,
        if show { "shown" } else { "not shown" }
    );

    show
}

/// Display version information
pub fn display_version() {
    println!("profstats v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Aggregation and HTML reporting for profiler statistics tables.");
}
