//! GitHub Actions output formatter.
//!
//! Produces output in GitHub Actions workflow command format:
//! ::error file={name},line={line},col={col}::{message}

use crate::analyzer::report::FileReport;

/// Format reports for GitHub Actions.
pub fn format(reports: &[FileReport]) -> String {
    let mut output = String::new();

    for report in reports {
        if let Some(err) = &report.error {
            output.push_str(&format!(
                "::error file={}::{}\n",
                report.file_path,
                escape_github(err)
            ));
        }

        for change in &report.changes {
            output.push_str(&format!(
                "::notice file={}::{}\n",
                report.file_path,
                escape_github(&change.to_string())
            ));
        }

        for violation in &report.violations {
            let location = match violation.position {
                Some(pos) => format!(",line={},col={}", pos.line, pos.column),
                None => String::new(),
            };
            output.push_str(&format!(
                "::error file={}{},title={}::Service '{}': {}\n",
                report.file_path,
                location,
                violation.kind,
                violation.service,
                escape_github(&violation.message)
            ));
        }
    }

    output
}

/// Escape special characters for GitHub Actions.
fn escape_github(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
