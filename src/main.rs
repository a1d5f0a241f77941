//! profstats CLI
//!
//! Turns a profiler's statistics table into a report grouped by source
//! file and by directory.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use profstats::commands::{
    check_gate, display_version, execute_report, validate_args, validate_summary_file, ReportArgs,
};
use profstats::flamegraph::FlamegraphConfig;
use profstats::parser::SortBy;
use profstats::utils::config::{ReportConfig, DEFAULT_CONFIG_FILE};

/// profstats - profiler stats aggregation
#[derive(Parser, Debug)]
#[command(name = "profstats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a report from a stats table
    Report {
        /// Stats table to read (`-` for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output path for the HTML report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output path for the JSON summary
        #[arg(long)]
        json: Option<PathBuf>,

        /// Output path for the SVG flame chart
        #[arg(short, long)]
        flamegraph: Option<PathBuf>,

        /// Sort keys, e.g. "cumtime,calls"
        #[arg(long)]
        sort: Option<SortBy>,

        /// Max entries per summary section
        #[arg(long)]
        group_records: Option<usize>,

        /// Max lines of raw excerpt
        #[arg(long)]
        raw_records: Option<usize>,

        /// Framework path marker for grouping
        #[arg(long)]
        framework: Option<String>,

        /// Config file
        #[arg(short, long, env = "PROFSTATS_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Flame chart title
        #[arg(long)]
        title: Option<String>,

        /// Flame chart width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,

        /// Print the plain-text report to stdout
        #[arg(long)]
        text: bool,
    },

    /// Validate a summary JSON file
    Validate {
        /// Path to summary JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Check whether a request would get a profiling report
    Gate {
        /// Request query string
        #[arg(short, long)]
        query: String,

        /// Debug mode is on
        #[arg(long)]
        debug: bool,

        /// Requester is a superuser
        #[arg(long)]
        superuser: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Report {
            input,
            output,
            json,
            flamegraph,
            sort,
            group_records,
            raw_records,
            framework,
            config,
            title,
            width,
            text,
        } => {
            // File settings first, flags on top
            let mut report_config = ReportConfig::load(&config)
                .with_context(|| format!("Failed to load config {}", config.display()))?;

            if let Some(sort_by) = sort {
                report_config.sort_by = sort_by;
            }
            if let Some(limit) = group_records {
                report_config.group_records = limit;
            }
            if let Some(limit) = raw_records {
                report_config.raw_records = limit;
            }
            if let Some(framework) = framework {
                report_config.framework = framework;
            }

            let fg_config = if flamegraph.is_some() {
                let mut config = FlamegraphConfig::new().with_width(width);
                if let Some(title_str) = title {
                    config = config.with_title(title_str);
                }
                Some(config)
            } else {
                None
            };

            let args = ReportArgs {
                input,
                output_html: output,
                output_json: json,
                output_svg: flamegraph,
                config: report_config,
                flamegraph_config: fg_config,
                print_text: text,
            };

            // Validate args first
            validate_args(&args)?;

            execute_report(args)?;
        }

        Commands::Validate { file } => {
            validate_summary_file(file)?;
        }

        Commands::Gate {
            query,
            debug,
            superuser,
        } => {
            if !check_gate(query, debug, superuser) {
                anyhow::bail!("Profiling report would not be shown for this request");
            }
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
