//! Compliance checking.
//!
//! [`check`] inspects a single service; [`validate`] runs it over every
//! service of a document and collects the result for one file.

use crate::analyzer::parser::{Document, ParseError, Service, parse_document};
use crate::analyzer::policy::Policy;
use crate::analyzer::rules::{check_alphabetization, check_field_order};
use crate::analyzer::types::{Violation, ViolationKind};

/// Which rule families a run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckScope {
    #[default]
    All,
    OrderOnly,
    AlphabetizationOnly,
}

impl CheckScope {
    pub fn includes(&self, kind: ViolationKind) -> bool {
        match self {
            Self::All => true,
            Self::OrderOnly => kind == ViolationKind::Order,
            Self::AlphabetizationOnly => kind == ViolationKind::Alphabetization,
        }
    }
}

/// Result of validating one compose file.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// The file path that was validated.
    pub file_path: String,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn new(file_path: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            file_path: file_path.into(),
            violations,
        }
    }

    /// True when no violations were found.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }
}

/// All violations of one service: order violations first, then strict-mode
/// violations, then alphabetization violations.
pub fn check(service: &Service, policy: &Policy) -> Vec<Violation> {
    let order = policy.canonical_order_for(&service.name);
    let mut violations = check_field_order(service, order, policy.is_strict());
    violations.extend(check_alphabetization(service, policy));
    violations
}

/// Check every service of a parsed document.
pub fn validate(
    document: &Document,
    path: &str,
    policy: &Policy,
    scope: CheckScope,
) -> ValidationResult {
    let violations = document
        .services()
        .into_iter()
        .flat_map(|service| check(service, policy))
        .filter(|v| scope.includes(v.kind))
        .collect();

    ValidationResult::new(path, violations)
}

/// Parse and check compose file content.
pub fn validate_content(
    content: &str,
    path: &str,
    policy: &Policy,
    scope: CheckScope,
) -> Result<ValidationResult, ParseError> {
    let document = parse_document(content)?;
    Ok(validate(&document, path, policy, scope))
}
