//! YAML parser for Docker Compose files.
//!
//! Decodes compose files into an order-preserving [`Document`] and tracks
//! where each service and field key was declared for error reporting.

pub mod document;
pub mod emit;

pub use document::{
    Document, Field, FieldValue, ParseError, Section, Service, ServiceGroup, parse_document,
};
pub use emit::{SerializationError, serialize};

use std::ops::Range;

use crate::analyzer::types::Position;

/// Line index of a compose file, split per YAML document.
///
/// Lookups are scoped to a single document so that a service redefined in a
/// later document resolves to its own declaration.
#[derive(Debug, Clone)]
pub struct SourceMap<'a> {
    lines: Vec<&'a str>,
    documents: Vec<Range<usize>>,
}

impl<'a> SourceMap<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().collect(),
            documents: document_line_ranges(source),
        }
    }

    /// Locate a key path within the given document.
    pub fn locate(&self, document: usize, path: &[&str]) -> Option<Position> {
        let range = self.documents.get(document)?.clone();
        let start = range.start;
        let found = find_position_for_key(&self.lines[range], path)?;
        Some(Position::new(found.line + start as u32, found.column))
    }
}

/// Line ranges (0-indexed, end exclusive) of each YAML document in `source`.
///
/// Marker lines (`---`) are excluded from the ranges. A leading marker does
/// not open an extra document.
pub fn document_line_ranges(source: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut opened = false;
    let mut line_count = 0;

    for (idx, line) in source.lines().enumerate() {
        line_count = idx + 1;
        if is_document_start(line) {
            if opened {
                ranges.push(start..idx);
            }
            start = idx + 1;
            opened = true;
        } else if is_content(line) {
            opened = true;
        }
    }

    if opened {
        ranges.push(start..line_count);
    }

    ranges
}

fn is_document_start(line: &str) -> bool {
    line.strip_prefix("---")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn is_content(line: &str) -> bool {
    let trimmed = line.trim();
    !(trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with('%')
        || trimmed == "...")
}

/// Find the position of a key path within a single document's lines.
///
/// Each path element after the first must be a direct child of the previous
/// one; the search stops once indentation falls back to the parent's level.
/// Lines are 1-indexed relative to `lines`, columns point at the key.
pub fn find_position_for_key(lines: &[&str], path: &[&str]) -> Option<Position> {
    if path.is_empty() {
        return Some(Position::new(1, 1));
    }

    let mut path_idx = 0;
    let mut parent_indent = 0;
    let mut child_indent: Option<usize> = None;

    for (line_num, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if !is_content(line) {
            continue;
        }

        let indent = line.len() - line.trim_start().len();

        if path_idx == 0 {
            if indent != 0 {
                continue;
            }
        } else {
            if indent <= parent_indent {
                return None;
            }
            match child_indent {
                None => child_indent = Some(indent),
                Some(expected) if indent != expected => continue,
                Some(_) => {}
            }
        }

        if key_matches(trimmed, path[path_idx]) {
            path_idx += 1;
            if path_idx == path.len() {
                return Some(Position::new((line_num + 1) as u32, (indent + 1) as u32));
            }
            parent_indent = indent;
            child_indent = None;
        }
    }

    None
}

/// Whether a trimmed line declares `key` (plain, single- or double-quoted).
fn key_matches(trimmed: &str, key: &str) -> bool {
    let declared = |candidate: &str| {
        trimmed
            .strip_prefix(candidate)
            .and_then(|rest| rest.strip_prefix(':'))
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    };

    declared(key) || declared(&format!("\"{}\"", key)) || declared(&format!("'{}'", key))
}
