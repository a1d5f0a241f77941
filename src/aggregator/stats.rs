//! Aggregate profiler records by location and by group, and render the report.
//!
//! One aggregator handles exactly one stats table: it is built, preprocessed
//! once by the constructor, rendered, and dropped.

use super::grouping::GroupRules;
use crate::output::html::wrap_preformatted;
use crate::parser::{parse, sort_stats_text, SortBy};
use crate::utils::config::{ReportConfig, DEFAULT_GROUP_RECORDS, DEFAULT_RAW_RECORDS};
use crate::utils::error::ConfigError;
use log::debug;
use std::collections::HashMap;

/// Accumulated time per key, remembering first-insertion order
#[derive(Debug, Clone, Default)]
pub struct Buckets {
    index: HashMap<String, usize>,
    entries: Vec<(String, f64)>,
}

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `time` to the bucket `name`, creating it if needed
    pub fn add(&mut self, name: &str, time: f64) {
        match self.index.get(name) {
            Some(&idx) => self.entries[idx].1 += time,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), time));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.index.get(name).map(|&idx| self.entries[idx].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, time)| (name.as_str(), *time))
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, time)| time).sum()
    }

    /// Entries by time, descending; ties keep insertion order
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Profiler stats aggregator
///
/// **Public** - main entry point for report generation
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    /// Raw table after upstream sorting
    stats_text: String,
    sort_by: SortBy,
    group_limit: usize,
    raw_limit: usize,
    rules: GroupRules,
    total_time: f64,
    record_count: usize,
    time_by_location: Buckets,
    time_by_group: Buckets,
}

impl StatsAggregator {
    /// Build and preprocess an aggregator with the default group rules
    ///
    /// # Arguments
    /// * `raw_text` - Profiler stats table
    /// * `sort_by` - Upstream ordering applied before parsing
    /// * `group_limit` - Max entries per summary section
    /// * `raw_limit` - Max lines of raw excerpt
    pub fn new(raw_text: &str, sort_by: SortBy, group_limit: usize, raw_limit: usize) -> Self {
        Self::with_rules(raw_text, sort_by, group_limit, raw_limit, GroupRules::default())
    }

    /// Build with an explicit rule chain
    pub fn with_rules(
        raw_text: &str,
        sort_by: SortBy,
        group_limit: usize,
        raw_limit: usize,
        rules: GroupRules,
    ) -> Self {
        let mut aggregator = Self {
            stats_text: sort_stats_text(raw_text, sort_by),
            sort_by,
            group_limit,
            raw_limit,
            rules,
            total_time: 0.0,
            record_count: 0,
            time_by_location: Buckets::new(),
            time_by_group: Buckets::new(),
        };
        aggregator.preprocess();
        aggregator
    }

    /// Build from report settings
    ///
    /// # Errors
    /// * `ConfigError::InvalidFramework` / `InvalidPattern` - unusable framework marker
    pub fn from_config(raw_text: &str, config: &ReportConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = GroupRules::for_framework(config.framework.trim())?;
        Ok(Self::with_rules(
            raw_text,
            config.sort_by,
            config.group_records,
            config.raw_records,
            rules,
        ))
    }

    /// Accumulate every record of the stats table
    ///
    /// Already called by the constructors. Calling it again adds every
    /// record a second time.
    pub fn preprocess(&mut self) {
        for record in parse(&self.stats_text) {
            let group = self.rules.derive_group(record.location);
            self.time_by_group.add(group, record.time);
            self.time_by_location.add(record.location, record.time);
            self.total_time += record.time;
            self.record_count += 1;
        }

        debug!(
            "Aggregated {} records: {:.3}s over {} locations, {} groups",
            self.record_count,
            self.total_time,
            self.time_by_location.len(),
            self.time_by_group.len()
        );
    }

    /// Share of the total time, 0 when nothing was recorded
    pub fn percent(&self, time: f64) -> f64 {
        if self.total_time != 0.0 {
            100.0 * time / self.total_time
        } else {
            0.0
        }
    }

    /// Render the top `limit` buckets, one `percent% tottime name` line each
    pub fn summarize(&self, buckets: &Buckets, limit: usize) -> String {
        let mut res = String::from("      tottime\n");
        for (name, time) in buckets.ranked().into_iter().take(limit) {
            res.push_str(&format!("{:4.1}% {:7.3} {}\n", self.percent(time), time, name));
        }
        res
    }

    /// Leading `raw_limit` lines of the sorted stats table
    pub fn raw_excerpt(&self) -> String {
        self.stats_text
            .split('\n')
            .take(self.raw_limit)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Plain-text report: raw excerpt, then the two summaries
    pub fn report_text(&self) -> String {
        format!(
            "{}\n\n---- By location ----\n\n{}\n\n---- By group ----\n\n{}\n",
            self.raw_excerpt(),
            self.summarize(&self.time_by_location, self.group_limit),
            self.summarize(&self.time_by_group, self.group_limit),
        )
    }

    /// Report wrapped for display in an HTML page
    pub fn render(&self) -> String {
        wrap_preformatted(&self.report_text())
    }

    pub fn stats_text(&self) -> &str {
        &self.stats_text
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn group_limit(&self) -> usize {
        self.group_limit
    }

    pub fn raw_limit(&self) -> usize {
        self.raw_limit
    }

    pub fn rules(&self) -> &GroupRules {
        &self.rules
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn time_by_location(&self) -> &Buckets {
        &self.time_by_location
    }

    pub fn time_by_group(&self) -> &Buckets {
        &self.time_by_group
    }
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new("", SortBy::default(), DEFAULT_GROUP_RECORDS, DEFAULT_RAW_RECORDS)
    }
}
