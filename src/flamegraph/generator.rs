//! SVG flame chart generation using inferno.
//!
//! Stats tables carry no caller information, so the chart is two levels
//! deep: one frame per group, with its locations stacked on top. Widths are
//! self time in microseconds.

use crate::aggregator::StatsAggregator;
use crate::utils::error::FlamegraphError;
use inferno::flamegraph::{self, Options};
use log::{debug, info};

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Profile by group".to_string(),
            width: 1200,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

/// Folded `group;location micros` lines, heaviest first
///
/// **Public** - the chart input, also handy for external flamegraph tools
pub fn folded_lines(aggregator: &StatsAggregator) -> Vec<String> {
    aggregator
        .time_by_location()
        .ranked()
        .into_iter()
        .filter_map(|(location, time)| {
            let micros = (time * 1_000_000.0).round() as u64;
            if micros == 0 {
                return None;
            }

            let group = aggregator.rules().derive_group(location);
            Some(if group == location {
                format!("{} {}", sanitize_frame(location), micros)
            } else {
                format!("{};{} {}", sanitize_frame(group), sanitize_frame(location), micros)
            })
        })
        .collect()
}

/// `;` separates frames in folded stacks
fn sanitize_frame(name: &str) -> String {
    name.replace(';', ":")
}

/// Generate an SVG flame chart from aggregated stats
///
/// **Public** - main entry point for chart generation
///
/// # Errors
/// * `FlamegraphError::EmptyRecords` - nothing with a measurable time
/// * `FlamegraphError::Render` - inferno failed to render
/// * `FlamegraphError::InvalidUtf8` - rendered SVG is not UTF-8
pub fn generate_flamegraph(
    aggregator: &StatsAggregator,
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    let lines = folded_lines(aggregator);
    if lines.is_empty() {
        return Err(FlamegraphError::EmptyRecords);
    }

    let config = config.cloned().unwrap_or_default();
    info!("Generating flamegraph with {} frames", lines.len());

    let mut options = Options::default();
    options.title = config.title.clone();
    options.count_name = "us".to_string();
    options.image_width = Some(config.width);

    let mut svg = Vec::new();
    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut svg)
        .map_err(|e| FlamegraphError::Render(e.to_string()))?;

    debug!("Flamegraph rendered ({} bytes)", svg.len());

    Ok(String::from_utf8(svg)?)
}
