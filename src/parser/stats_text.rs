//! Record parser for profiler statistics tables.
//!
//! Expected input (as printed by pstats-style profilers):
//!
//! ```text
//!          4 function calls in 0.030 seconds
//!
//!    Ordered by: cumulative time
//!
//!    ncalls  tottime  percall  cumtime  percall filename:lineno(function)
//!         1    0.010    0.010    0.010    0.010 /app/views.py:42(index)
//! ```
//!
//! The first five lines are summary metadata. Every following line with
//! exactly six whitespace-separated fields is a record; anything else is
//! skipped without error.

use crate::utils::config::{STATS_HEADER_LINES, STATS_RECORD_FIELDS};
use log::trace;
use std::str::Split;

/// One parsed line of profiler output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatRecord<'a> {
    /// Source file of the profiled function (text before the first `:`)
    pub location: &'a str,

    /// Time spent in the function itself (`tottime` column)
    pub time: f64,
}

/// Lazy iterator over the records of a stats table
///
/// Single-pass: the iterator is consumed by value and cannot be rewound.
/// Call [`parse`] again on the same text to iterate a second time.
#[derive(Debug)]
pub struct Records<'a> {
    lines: std::iter::Skip<Split<'a, char>>,
}

impl<'a> Iterator for Records<'a> {
    type Item = StatRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            if let Some(record) = parse_record(line) {
                return Some(record);
            }
            trace!("Skipping non-record line: {:?}", line);
        }
        None
    }
}

/// Parse a raw stats table into records
///
/// **Public** - main entry point for parsing
///
/// Header lines, blank lines, lines with a field count other than six,
/// non-numeric times and empty locations never produce a record.
pub fn parse(raw_text: &str) -> Records<'_> {
    Records {
        lines: raw_text.split('\n').skip(STATS_HEADER_LINES),
    }
}

/// Parse a single data line
///
/// **Public** - also used by the upstream sort to recognise records
pub fn parse_record(line: &str) -> Option<StatRecord<'_>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != STATS_RECORD_FIELDS {
        return None;
    }

    let time = fields[1].parse::<f64>().ok().filter(|t| t.is_finite())?;
    let location = fields[5].split(':').next().unwrap_or_default();
    if location.is_empty() {
        return None;
    }

    Some(StatRecord { location, time })
}
