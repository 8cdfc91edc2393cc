//! Core result types for the compose field-order validator.
//!
//! - `Position` - Source location of a service or field key
//! - `ViolationKind` / `Violation` - A single compliance problem
//! - `FixKind` / `FixRecord` - A single change made by the rewriter

use std::fmt;

/// Position in the source file (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Kind of compliance problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A field sits at the wrong position, or is not allowed in strict mode.
    Order,
    /// A special field's entries are not sorted.
    Alphabetization,
}

impl ViolationKind {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Alphabetization => "alphabetization",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A compliance violation found in one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// What kind of rule was broken.
    pub kind: ViolationKind,
    /// Name of the owning service.
    pub service: String,
    /// The offending field.
    pub field: String,
    /// A human-readable message describing the violation.
    pub message: String,
    /// Field expected at this position (order violations only).
    pub expected: Option<String>,
    /// Field actually found at this position (order violations only).
    pub actual: Option<String>,
    /// Where the offending key was declared, when known.
    pub position: Option<Position>,
}

impl Violation {
    /// Create a new violation without positional detail.
    pub fn new(
        kind: ViolationKind,
        service: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            service: service.into(),
            field: field.into(),
            message: message.into(),
            expected: None,
            actual: None,
            position: None,
        }
    }

    /// Attach the expected and actual field names.
    pub fn with_mismatch(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    /// Attach a source position.
    pub fn with_position(mut self, position: Option<Position>) -> Self {
        self.position = position;
        self
    }

    /// Source line, if known.
    pub fn line(&self) -> Option<u32> {
        self.position.map(|p| p.line)
    }
}

/// Kind of change performed by the rewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixKind {
    /// The service's fields were put into canonical order.
    Reordered,
    /// A special field's entries were sorted.
    Alphabetized,
}

impl FixKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reordered => "reordered",
            Self::Alphabetized => "alphabetized",
        }
    }
}

/// One change made to one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixRecord {
    pub service: String,
    /// The field that changed; `None` for a whole-service reorder.
    pub field: Option<String>,
    pub kind: FixKind,
}

impl FixRecord {
    pub fn reordered(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            field: None,
            kind: FixKind::Reordered,
        }
    }

    pub fn alphabetized(service: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            field: Some(field.into()),
            kind: FixKind::Alphabetized,
        }
    }
}

impl fmt::Display for FixRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.field) {
            (FixKind::Alphabetized, Some(field)) => {
                write!(f, "service '{}': alphabetized '{}'", self.service, field)
            }
            _ => write!(f, "service '{}': reordered fields", self.service),
        }
    }
}
