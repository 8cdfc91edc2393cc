//! Output formatters for validation results.
//!
//! - Stylish - Colored terminal output (default)
//! - JSON - Machine-readable JSON output
//! - GitHub - GitHub Actions annotations

pub mod github;
pub mod json;
pub mod stylish;

use crate::analyzer::report::FileReport;

/// Output format for validation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Stylish colored terminal output (default)
    #[default]
    Stylish,
    /// JSON format for machine processing
    Json,
    /// GitHub Actions annotations
    GitHub,
}

/// Options that affect how much the stylish formatter prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    /// Also list files that passed.
    pub verbose: bool,
    /// The run was started with `--fix`.
    pub fix_mode: bool,
    /// Only print problems.
    pub quiet: bool,
}

/// Format reports according to the specified format.
pub fn format_results(reports: &[FileReport], format: OutputFormat, options: FormatOptions) -> String {
    match format {
        OutputFormat::Stylish => stylish::format(reports, options),
        OutputFormat::Json => json::format(reports),
        OutputFormat::GitHub => github::format(reports),
    }
}
