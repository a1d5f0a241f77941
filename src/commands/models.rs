use crate::flamegraph::FlamegraphConfig;
use crate::utils::config::ReportConfig;
use std::path::PathBuf;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Stats table to read (`-` for stdin)
    pub input: PathBuf,

    /// Output path for the HTML report (optional)
    pub output_html: Option<PathBuf>,

    /// Output path for the JSON summary (optional)
    pub output_json: Option<PathBuf>,

    /// Output path for the SVG flame chart (optional)
    pub output_svg: Option<PathBuf>,

    /// Sorting, limits and grouping
    pub config: ReportConfig,

    /// Flame chart configuration
    pub flamegraph_config: Option<FlamegraphConfig>,

    /// Print the plain-text report to stdout
    pub print_text: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("-"),
            output_html: Some(PathBuf::from("report.html")),
            output_json: None,
            output_svg: None,
            config: ReportConfig::default(),
            flamegraph_config: None,
            print_text: false,
        }
    }
}

impl ReportArgs {
    /// Whether the input is read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }

    /// Nothing would be written anywhere
    pub fn has_no_outputs(&self) -> bool {
        self.output_html.is_none() && self.output_json.is_none() && self.output_svg.is_none()
    }
}
