//! Alphabetization
//!
//! `environment`, `volumes` and `labels` entries must be sorted by key,
//! ignoring case. Each field can be switched off in the policy.

use crate::analyzer::parser::Service;
use crate::analyzer::policy::Policy;
use crate::analyzer::rules::SpecialField;
use crate::analyzer::types::{Violation, ViolationKind};

/// At most one violation per special field.
pub fn check_alphabetization(service: &Service, policy: &Policy) -> Vec<Violation> {
    SpecialField::ALL
        .iter()
        .filter(|special| policy.alphabetization().is_enabled(**special))
        .filter_map(|special| {
            let field = service.field(special.name())?;
            if special.is_alphabetized(&field.value) {
                return None;
            }
            Some(
                Violation::new(
                    ViolationKind::Alphabetization,
                    &service.name,
                    special.name(),
                    special.violation_message(),
                )
                .with_position(field.position.or(service.position)),
            )
        })
        .collect()
}
