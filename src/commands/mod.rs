//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod report;
pub mod utils;

// Re-export main command functions
pub use models::ReportArgs;
pub use report::{execute_report, validate_args};
pub use utils::{check_gate, display_version, validate_summary_file};
