//! Configuration and constants for the report pipeline.

use crate::parser::SortBy;
use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current summary schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Number of summary lines reserved for profiler metadata at the top of a stats table
pub const STATS_HEADER_LINES: usize = 5;

/// Fields in a well-formed stats record:
/// `ncalls tottime percall cumtime percall filename:lineno(function)`
pub const STATS_RECORD_FIELDS: usize = 6;

pub const DEFAULT_GROUP_RECORDS: usize = 40;
pub const DEFAULT_RAW_RECORDS: usize = 100;

// Limits used when the report replaces a web response body
pub const WEB_GROUP_RECORDS: usize = 50;
pub const WEB_RAW_RECORDS: usize = 200;

/// Path fragment marking framework-internal code in the first grouping rule
pub const DEFAULT_FRAMEWORK: &str = "django";

/// Query parameter that requests a profiling report
pub const DEFAULT_QUERY_FLAG: &str = "prof";

/// Default config file looked up by the CLI
pub const DEFAULT_CONFIG_FILE: &str = "profstats.toml";

/// Report settings, loadable from `profstats.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReportConfig {
    /// Upstream ordering of the stats table
    #[serde(default)]
    pub sort_by: SortBy,

    /// Max entries per summary section
    #[serde(default = "default_group_records")]
    pub group_records: usize,

    /// Max lines of raw excerpt
    #[serde(default = "default_raw_records")]
    pub raw_records: usize,

    /// Framework path marker for grouping
    #[serde(default = "default_framework")]
    pub framework: String,
}

fn default_group_records() -> usize {
    DEFAULT_GROUP_RECORDS
}

fn default_raw_records() -> usize {
    DEFAULT_RAW_RECORDS
}

fn default_framework() -> String {
    DEFAULT_FRAMEWORK.to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sort_by: SortBy::default(),
            group_records: default_group_records(),
            raw_records: default_raw_records(),
            framework: default_framework(),
        }
    }
}

impl ReportConfig {
    /// Settings used when a report replaces a web response
    pub fn web() -> Self {
        Self {
            group_records: WEB_GROUP_RECORDS,
            raw_records: WEB_RAW_RECORDS,
            ..Self::default()
        }
    }

    /// Load config from a TOML file
    ///
    /// A missing file yields the defaults; unreadable or invalid files are errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => return Err(ConfigError::ReadFailed(err)),
        };

        let config: ReportConfig = toml::from_str(&content)?;
        config.validate()?;

        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Check values that serde cannot reject on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        let framework = self.framework.trim();
        if framework.is_empty() || framework.contains('/') {
            return Err(ConfigError::InvalidFramework(self.framework.clone()));
        }
        Ok(())
    }
}
