//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! The aggregator itself has no error path: malformed stats lines are
//! filtered out, never reported.

use thiserror::Error;

/// Errors that can occur while loading report configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Invalid TOML config: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("Invalid framework marker: {0:?}")]
    InvalidFramework(String),

    #[error("Invalid grouping pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("No profiling records to render")]
    EmptyRecords,

    #[error("Failed to render flame chart: {0}")]
    Render(String),

    #[error("Flamegraph output is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Unsupported summary schema version: {0}")]
    UnsupportedVersion(String),
}
