//! Output writers for reports, summaries and flame charts.
//!
//! This module handles writing data to disk in various formats:
//! - HTML reports (preformatted text)
//! - JSON summaries (pretty)
//! - SVG flame charts

pub mod html;
pub mod json;
pub mod svg;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

// Re-export main functions
pub use html::{escape_html, wrap_preformatted, write_report};
pub use json::{read_summary, to_summary, write_summary};
pub use svg::write_svg;

/// Validate that an output path is writable
///
/// **Public** - shared by every writer
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate `path` and create its parent directories if needed
///
/// **Private** - internal helper for the writers
fn prepare_path(path: &Path) -> Result<(), OutputError> {
    validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
