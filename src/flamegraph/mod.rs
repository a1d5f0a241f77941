//! Flame chart generation using the inferno library.
//!
//! This module converts aggregated stats into SVG flame charts that show
//! where self time is spent, grouped the same way as the report.

pub mod generator;

// Re-export main types
pub use generator::{folded_lines, generate_flamegraph, FlamegraphConfig};
