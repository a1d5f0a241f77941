//! HTML report output.
//!
//! The report is plain text; for a browser it is escaped and wrapped in a
//! `<pre>` block so column alignment survives.

use super::prepare_path;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Escape the characters HTML treats as markup
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap report text in a preformatted block
pub fn wrap_preformatted(text: &str) -> String {
    format!("<pre>\n{}</pre>", escape_html(text))
}

/// Write a rendered report to a file
///
/// **Public** - main entry point for HTML output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
pub fn write_report(html: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    prepare_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(html.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!("Report written successfully ({} bytes)", html.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<string>:1(<module>) & 'x' \"y\""),
            "&lt;string&gt;:1(&lt;module&gt;) &amp; &#39;x&#39; &quot;y&quot;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_wrap_preformatted() {
        assert_eq!(wrap_preformatted("a < b\n"), "<pre>\na &lt; b\n</pre>");
    }

    #[test]
    fn test_write_report_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/report.html");

        write_report("<pre>\nx</pre>", &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<pre>\nx</pre>");
    }

    #[test]
    fn test_write_report_rejects_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(write_report("x", temp_dir.path()).is_err());
    }
}
