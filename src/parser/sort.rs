//! Upstream ordering of a stats table.
//!
//! The profiler prints its table in a caller-chosen order. When the table
//! arrives already rendered, we reproduce that ordering here so the raw
//! excerpt at the top of the report shows the most relevant rows first.

use crate::utils::config::{STATS_HEADER_LINES, STATS_RECORD_FIELDS};
use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Column a stats table can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// `ncalls`, descending
    Calls,
    /// `tottime`, descending
    TotalTime,
    /// `cumtime`, descending
    CumulativeTime,
    /// `tottime / ncalls` (first `percall` column), descending
    PerCall,
    /// `cumtime / primitive calls` (second `percall` column), descending
    CumPerCall,
    /// `filename:lineno(function)`, ascending
    Name,
}

impl SortKey {
    /// Canonical name, as accepted by `FromStr`
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Calls => "calls",
            SortKey::TotalTime => "tottime",
            SortKey::CumulativeTime => "cumtime",
            SortKey::PerCall => "percall",
            SortKey::CumPerCall => "cumpercall",
            SortKey::Name => "name",
        }
    }

    fn compare(self, a: &SortRow<'_>, b: &SortRow<'_>) -> Ordering {
        match self {
            SortKey::Calls => b.calls.total_cmp(&a.calls),
            SortKey::TotalTime => b.tottime.total_cmp(&a.tottime),
            SortKey::CumulativeTime => b.cumtime.total_cmp(&a.cumtime),
            SortKey::PerCall => b.percall.total_cmp(&a.percall),
            SortKey::CumPerCall => b.cumpercall.total_cmp(&a.cumpercall),
            SortKey::Name => a.name.cmp(b.name),
        }
    }
}

impl FromStr for SortKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calls" | "ncalls" => Ok(SortKey::Calls),
            "time" | "tottime" => Ok(SortKey::TotalTime),
            "cumulative" | "cumtime" => Ok(SortKey::CumulativeTime),
            "percall" => Ok(SortKey::PerCall),
            "cumpercall" => Ok(SortKey::CumPerCall),
            // The table only prints `filename:lineno(function)`, so every
            // name-like key orders by that whole token
            "name" | "file" | "filename" | "module" | "nfl" | "stdname" => Ok(SortKey::Name),
            other => Err(ConfigError::UnknownSortKey(other.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary and secondary sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortBy {
    pub primary: SortKey,
    pub secondary: SortKey,
}

impl SortBy {
    pub fn new(primary: SortKey, secondary: SortKey) -> Self {
        Self { primary, secondary }
    }
}

impl Default for SortBy {
    fn default() -> Self {
        Self::new(SortKey::CumulativeTime, SortKey::Calls)
    }
}

impl FromStr for SortBy {
    type Err = ConfigError;

    /// Accepts `"primary,secondary"` or a single key (secondary falls back to calls)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(',') {
            Some((primary, secondary)) => Ok(Self::new(primary.parse()?, secondary.parse()?)),
            None => Ok(Self::new(s.parse()?, SortKey::Calls)),
        }
    }
}

impl TryFrom<String> for SortBy {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortBy> for String {
    fn from(value: SortBy) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.primary, self.secondary)
    }
}

/// Sortable view of one data line
struct SortRow<'a> {
    line: &'a str,
    calls: f64,
    tottime: f64,
    percall: f64,
    cumtime: f64,
    cumpercall: f64,
    name: &'a str,
}

impl<'a> SortRow<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != STATS_RECORD_FIELDS {
            return None;
        }

        // Recursive calls are printed as "total/primitive"
        let calls = fields[0].split('/').next()?.parse::<f64>().ok()?;

        Some(Self {
            line,
            calls,
            tottime: fields[1].parse().ok()?,
            percall: fields[2].parse().ok()?,
            cumtime: fields[3].parse().ok()?,
            cumpercall: fields[4].parse().ok()?,
            name: fields[5],
        })
    }
}

/// Reorder the data lines of a stats table
///
/// **Public** - applied before parsing and before the raw excerpt is taken
///
/// The header and every line that is not a sortable record keep their
/// positions; records are stably reordered into the remaining slots.
pub fn sort_stats_text(raw_text: &str, sort_by: SortBy) -> String {
    let mut lines: Vec<&str> = raw_text.split('\n').collect();
    if lines.len() <= STATS_HEADER_LINES {
        return raw_text.to_string();
    }

    let mut slots = Vec::new();
    let mut rows = Vec::new();
    for (idx, line) in lines.iter().enumerate().skip(STATS_HEADER_LINES) {
        if let Some(row) = SortRow::parse(line) {
            slots.push(idx);
            rows.push(row);
        }
    }

    debug!("Sorting {} stats rows by {}", rows.len(), sort_by);

    rows.sort_by(|a, b| {
        sort_by
            .primary
            .compare(a, b)
            .then_with(|| sort_by.secondary.compare(a, b))
    });

    for (slot, row) in slots.into_iter().zip(rows) {
        lines[slot] = row.line;
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "         6 function calls in 0.060 seconds\n\n   Ordered by: standard name\n\n   ncalls  tottime  percall  cumtime  percall filename:lineno(function)";

    fn data_lines(text: &str) -> Vec<&str> {
        text.split('\n')
            .skip(STATS_HEADER_LINES)
            .filter(|l| !l.trim().is_empty())
            .collect()
    }

    #[test]
    fn test_sort_key_aliases() {
        assert_eq!("cumulative".parse::<SortKey>().unwrap(), SortKey::CumulativeTime);
        assert_eq!("ncalls".parse::<SortKey>().unwrap(), SortKey::Calls);
        assert_eq!("TIME".parse::<SortKey>().unwrap(), SortKey::TotalTime);
        assert_eq!("filename".parse::<SortKey>().unwrap(), SortKey::Name);
        assert_eq!("percall".parse::<SortKey>().unwrap(), SortKey::PerCall);
        assert_eq!("cumpercall".parse::<SortKey>().unwrap(), SortKey::CumPerCall);
        assert!("pcalls".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_sort_by_parsing() {
        assert_eq!("cumtime,calls".parse::<SortBy>().unwrap(), SortBy::default());
        assert_eq!(
            "tottime".parse::<SortBy>().unwrap(),
            SortBy::new(SortKey::TotalTime, SortKey::Calls)
        );
        assert!("cumtime,".parse::<SortBy>().is_err());
        assert_eq!(SortBy::default().to_string(), "cumtime,calls");
    }

    #[test]
    fn test_sort_by_cumulative_then_calls() {
        let text = format!(
            "{HEADER}\n\
             1 0.010 0.010 0.010 0.010 /app/a.py:1(a)\n\
             2 0.001 0.001 0.030 0.015 /app/b.py:1(b)\n\
             5 0.002 0.001 0.010 0.002 /app/c.py:1(c)\n\n"
        );

        let sorted = sort_stats_text(&text, SortBy::default());
        let rows = data_lines(&sorted);

        assert!(rows[0].ends_with("/app/b.py:1(b)"));
        // Tie on cumtime broken by calls, descending
        assert!(rows[1].ends_with("/app/c.py:1(c)"));
        assert!(rows[2].ends_with("/app/a.py:1(a)"));
    }

    #[test]
    fn test_sort_by_percall() {
        let text = format!(
            "{HEADER}\n\
             4 0.040 0.010 0.040 0.010 /app/many.py:1(many)\n\
             1 0.020 0.020 0.020 0.020 /app/once.py:1(once)"
        );

        let sorted = sort_stats_text(&text, "percall,calls".parse().unwrap());
        let rows = data_lines(&sorted);
        assert!(rows[0].ends_with("/app/once.py:1(once)"));
        assert!(rows[1].ends_with("/app/many.py:1(many)"));
    }

    #[test]
    fn test_sort_by_cumpercall() {
        let text = format!(
            "{HEADER}\n\
             1 0.001 0.001 0.050 0.050 /app/root.py:1(root)\n\
             5 0.010 0.002 0.100 0.020 /app/loop.py:1(loop)\n\
             2 0.001 0.001 0.200 0.100 /app/slow.py:1(slow)"
        );

        let sorted = sort_stats_text(&text, SortBy::new(SortKey::CumPerCall, SortKey::Name));
        let rows = data_lines(&sorted);
        assert!(rows[0].ends_with("/app/slow.py:1(slow)"));
        assert!(rows[1].ends_with("/app/root.py:1(root)"));
        assert!(rows[2].ends_with("/app/loop.py:1(loop)"));
    }

    #[test]
    fn test_sort_by_name_ascending() {
        let text = format!(
            "{HEADER}\n\
             1 0.010 0.010 0.010 0.010 /z.py:1(z)\n\
             1 0.010 0.010 0.010 0.010 /a.py:1(a)"
        );

        let sorted = sort_stats_text(&text, SortBy::new(SortKey::Name, SortKey::Calls));
        let rows = data_lines(&sorted);
        assert!(rows[0].ends_with("/a.py:1(a)"));
    }

    #[test]
    fn test_sort_recursive_calls() {
        let text = format!(
            "{HEADER}\n\
             2 0.010 0.010 0.010 0.010 /a.py:1(a)\n\
             7/1 0.010 0.010 0.010 0.010 /b.py:1(b)"
        );

        let sorted = sort_stats_text(&text, SortBy::new(SortKey::Calls, SortKey::Name));
        assert!(data_lines(&sorted)[0].ends_with("/b.py:1(b)"));
    }

    #[test]
    fn test_sort_keeps_header_and_other_lines() {
        let text = format!(
            "{HEADER}\n\
             1 0.001 0.001 0.001 0.001 /a.py:1(a)\n\
             1 0.000 0.000 0.000 0.000 {{method 'disable' of '_lsprof.Profiler' objects}}\n\
             1 0.005 0.005 0.005 0.005 /b.py:1(b)\n\n"
        );

        let sorted = sort_stats_text(&text, SortBy::default());
        let lines: Vec<&str> = sorted.split('\n').collect();

        assert_eq!(lines[..STATS_HEADER_LINES].join("\n"), HEADER);
        assert!(lines[5].ends_with("/b.py:1(b)"));
        assert!(lines[6].contains("method 'disable'"));
        assert!(lines[7].ends_with("/a.py:1(a)"));
        assert!(sorted.ends_with("\n\n"));
    }

    #[test]
    fn test_sort_short_input_unchanged() {
        assert_eq!(sort_stats_text("a\nb", SortBy::default()), "a\nb");
    }
}
