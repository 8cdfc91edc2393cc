//! # Analyzer Module
//!
//! Checks Docker Compose service definitions against a canonical field
//! order and keeps `environment`, `volumes` and `labels` entries sorted.
//!
//! # Features
//!
//! - Order-preserving compose parsing with key positions
//! - Field-order and strict-mode checks with per-service overrides
//! - Case-insensitive alphabetization checks
//! - Automatic fixing that never drops a field or entry
//! - Stylish, JSON and GitHub Actions output
//!
//! # Example
//!
//! ```rust,ignore
//! use compose_validator::analyzer::{CheckScope, Policy, validate_content};
//!
//! let compose = r#"
//! services:
//!   web:
//!     image: nginx:latest
//!     container_name: web
//! "#;
//!
//! let result = validate_content(compose, "docker-compose.yml", &Policy::default(), CheckScope::All)?;
//! for violation in result.violations {
//!     println!("{}: {}", violation.service, violation.message);
//! }
//! ```
//!
//! # Limitations
//!
//! Fixed files are re-emitted from the parsed model: comments, blank lines,
//! anchors and the original quoting style are not preserved.

pub mod check;
pub mod fix;
pub mod formatter;
pub mod parser;
pub mod policy;
pub mod report;
pub mod rules;
pub mod types;

pub use check::{CheckScope, ValidationResult, check, validate, validate_content};
pub use fix::{FixError, FixResult, ServiceFix, fix, fix_content, fix_document};
pub use formatter::{FormatOptions, OutputFormat, format_results};
pub use parser::{
    Document, Field, FieldValue, ParseError, SerializationError, Service, parse_document,
    serialize,
};
pub use policy::{AlphabetizationRules, DEFAULT_FIELD_ORDER, Policy};
pub use report::{FileReport, Summary};
pub use rules::{EntryKey, SpecialField};
pub use types::{FixKind, FixRecord, Position, Violation, ViolationKind};
