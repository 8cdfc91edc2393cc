//! Per-file outcome of a validation run.

use crate::analyzer::check::ValidationResult;
use crate::analyzer::types::{FixRecord, Violation};

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    /// The file path as given or matched.
    pub file_path: String,
    /// Violations still present after the run.
    pub violations: Vec<Violation>,
    /// Changes made (or, under dry run, that would be made).
    pub changes: Vec<FixRecord>,
    /// Whether fixed content was written back.
    pub written: bool,
    /// Read, parse, fix or write failure.
    pub error: Option<String>,
}

impl FileReport {
    /// Report for a file that was only checked.
    pub fn checked(result: ValidationResult) -> Self {
        Self {
            file_path: result.file_path,
            violations: result.violations,
            changes: Vec::new(),
            written: false,
            error: None,
        }
    }

    /// Report for a file that could not be processed.
    pub fn failed(file_path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            violations: Vec::new(),
            changes: Vec::new(),
            written: false,
            error: Some(error.into()),
        }
    }

    /// Attach fix records.
    pub fn with_changes(mut self, changes: Vec<FixRecord>, written: bool) -> Self {
        self.changes = changes;
        self.written = written;
        self
    }

    /// No error and no remaining violations.
    pub fn is_valid(&self) -> bool {
        self.error.is_none() && self.violations.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Totals over all reports of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub files: usize,
    pub valid: usize,
    pub fixed: usize,
    pub errors: usize,
    pub violations: usize,
}

impl Summary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Self {
            files: reports.len(),
            ..Self::default()
        };
        for report in reports {
            if report.is_valid() {
                summary.valid += 1;
            }
            if report.written {
                summary.fixed += 1;
            }
            if report.error.is_some() {
                summary.errors += 1;
            }
            summary.violations += report.violations.len();
        }
        summary
    }

    pub fn all_valid(&self) -> bool {
        self.valid == self.files
    }
}
