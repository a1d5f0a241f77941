//! SVG flame chart output writer.
//!
//! Writes SVG content to files with proper encoding.

use super::prepare_path;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write SVG content to a file
///
/// **Public** - main entry point for SVG output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
///
/// # Example
/// ```ignore
/// let svg = generate_flamegraph(&aggregator, None)?;
/// write_svg(&svg, "flamegraph.svg")?;
/// ```
pub fn write_svg(svg_content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing SVG to: {}", output_path.display());

    prepare_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(svg_content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    let file_size = svg_content.len();
    info!(
        "SVG written successfully ({} bytes, {:.2} KB)",
        file_size,
        file_size as f64 / 1024.0
    );

    Ok(())
}
