//! profstats
//!
//! Aggregation and HTML reporting for profiler statistics tables.
//!
//! The core is [`aggregator::StatsAggregator`]: it parses the
//! `ncalls tottime percall cumtime percall filename:lineno(function)` table a
//! profiler prints, totals self time per source file and per directory
//! group, and renders a preformatted report.
//!
//! ```ignore
//! use profstats::aggregator::StatsAggregator;
//! use profstats::parser::SortBy;
//!
//! let aggregator = StatsAggregator::new(&stats_text, SortBy::default(), 40, 100);
//! let html = aggregator.render();
//! ```
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install profstats
//! profstats --help
//! ```

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod middleware;
pub mod output;
pub mod parser;
pub mod utils;
