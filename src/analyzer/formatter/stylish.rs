//! Stylish (colored terminal) output formatter.

use colored::Colorize;

use crate::analyzer::formatter::FormatOptions;
use crate::analyzer::report::{FileReport, Summary};
use crate::analyzer::types::{Violation, ViolationKind};

/// Format reports for a terminal.
pub fn format(reports: &[FileReport], options: FormatOptions) -> String {
    let mut output = String::new();

    for report in reports {
        if let Some(err) = &report.error {
            output.push_str(&format!(
                "{}\n",
                format!("Error processing {}: {}", report.file_path, err).red()
            ));
            continue;
        }

        if report.has_changes() {
            let header = if report.written {
                format!("✓ Fixed {}:", report.file_path)
            } else {
                format!("✓ Would fix {}:", report.file_path)
            };
            output.push_str(&format!("{}\n", header.green()));
            for change in &report.changes {
                output.push_str(&format!("  - {}\n", change));
            }
        }

        // A dry run leaves the file as it was; its changes already say what is wrong.
        let show_violations = !report.violations.is_empty() && (report.written || !report.has_changes());
        if show_violations {
            output.push_str(&format!("{}\n", format!("✗ {}:", report.file_path).red()));
            for violation in &report.violations {
                push_violation(&mut output, violation);
            }
        } else if report.violations.is_empty() && !report.has_changes() && options.verbose {
            output.push_str(&format!("{}\n", format!("✓ {}: valid", report.file_path).green()));
        }
    }

    let summary = Summary::from_reports(reports);
    if summary.all_valid() {
        if !options.quiet {
            output.push_str(&format!("{}\n", "✓ All files are valid!".green()));
        }
        return output;
    }

    output.push_str(&format!(
        "{}\n",
        format!("✗ Found {} violation(s)", summary.violations).red()
    ));
    if summary.errors > 0 {
        output.push_str(&format!(
            "{}\n",
            format!("✗ {} file(s) could not be processed", summary.errors).red()
        ));
    }
    if !options.fix_mode && summary.violations > 0 {
        output.push_str("\nRun with --fix to automatically correct issues\n");
    }

    output
}

fn push_violation(output: &mut String, violation: &Violation) {
    output.push_str(&format!(
        "  Service '{}': {}\n",
        violation.service, violation.message
    ));

    match violation.kind {
        ViolationKind::Order => {
            if let (Some(expected), Some(actual)) = (&violation.expected, &violation.actual) {
                output.push_str(&format!("    Expected: '{}' at this position\n", expected));
                output.push_str(&format!("    Actual: '{}'\n", actual));
            }
        }
        ViolationKind::Alphabetization => {
            output.push_str(&format!(
                "    Field '{}' should be alphabetized\n",
                violation.field
            ));
        }
    }

    if let Some(line) = violation.line() {
        output.push_str(&format!("    Line: {}\n", line));
    }
}
