//! Field order
//!
//! Fields named in the canonical order must appear in that relative order.
//! Fields the order does not name are ignored, except in strict mode where
//! each one is a violation.

use std::collections::HashSet;

use crate::analyzer::parser::Service;
use crate::analyzer::types::{Violation, ViolationKind};

/// A position where the declared field differs from the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderMismatch<'a> {
    /// Index among the canonical fields the service declares.
    pub index: usize,
    pub expected: &'a str,
    pub actual: &'a str,
}

/// Compare the service's canonical fields, in declaration order, against
/// the canonical order restricted to the fields the service declares.
pub fn order_mismatches<'a>(service: &'a Service, order: &'a [String]) -> Vec<OrderMismatch<'a>> {
    let known: HashSet<&str> = order.iter().map(String::as_str).collect();
    let declared: HashSet<&str> = service.fields.iter().map(|f| f.name.as_str()).collect();

    let actual = service
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .filter(|name| known.contains(name));
    let expected = order
        .iter()
        .map(String::as_str)
        .filter(|name| declared.contains(name));

    actual
        .zip(expected)
        .enumerate()
        .filter(|(_, (actual, expected))| actual != expected)
        .map(|(index, (actual, expected))| OrderMismatch {
            index,
            expected,
            actual,
        })
        .collect()
}

pub fn is_in_canonical_order(service: &Service, order: &[String]) -> bool {
    order_mismatches(service, order).is_empty()
}

/// Order violations for one service, in declaration order, followed by
/// strict-mode violations for fields outside the canonical order.
pub fn check_field_order(service: &Service, order: &[String], strict: bool) -> Vec<Violation> {
    let mut violations: Vec<Violation> = order_mismatches(service, order)
        .into_iter()
        .map(|mismatch| {
            Violation::new(
                ViolationKind::Order,
                &service.name,
                mismatch.actual,
                format!("field '{}' is out of order", mismatch.actual),
            )
            .with_mismatch(mismatch.expected, mismatch.actual)
            .with_position(
                service
                    .field(mismatch.actual)
                    .and_then(|f| f.position)
                    .or(service.position),
            )
        })
        .collect();

    if strict {
        let known: HashSet<&str> = order.iter().map(String::as_str).collect();
        violations.extend(
            service
                .fields
                .iter()
                .filter(|field| !known.contains(field.name.as_str()))
                .map(|field| {
                    Violation::new(
                        ViolationKind::Order,
                        &service.name,
                        &field.name,
                        format!("field '{}' is not allowed in strict mode", field.name),
                    )
                    .with_position(field.position.or(service.position))
                }),
        );
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::parser::{Field, parse_document};
    use crate::analyzer::policy::DEFAULT_FIELD_ORDER;
    use crate::analyzer::types::Position;

    fn default_order() -> Vec<String> {
        DEFAULT_FIELD_ORDER.iter().map(|s| s.to_string()).collect()
    }

    fn service(fields: &[&str]) -> Service {
        Service::new(
            "web",
            fields.iter().map(|name| Field::new(*name, "x")).collect(),
        )
    }

    #[test]
    fn test_no_violation_correct_order() {
        let svc = service(&["container_name", "image", "environment", "volumes"]);
        assert!(check_field_order(&svc, &default_order(), false).is_empty());
        assert!(is_in_canonical_order(&svc, &default_order()));
    }

    #[test]
    fn test_swapped_fields() {
        let svc = service(&["image", "container_name", "environment"]);
        let violations = check_field_order(&svc, &default_order(), false);

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "image");
        assert_eq!(violations[0].expected.as_deref(), Some("container_name"));
        assert_eq!(violations[0].actual.as_deref(), Some("image"));
        assert_eq!(violations[0].message, "field 'image' is out of order");
        assert_eq!(violations[1].field, "container_name");
        assert_eq!(violations[1].expected.as_deref(), Some("image"));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let svc = service(&["command", "image", "depends_on", "restart"]);
        assert!(check_field_order(&svc, &default_order(), false).is_empty());
    }

    #[test]
    fn test_strict_mode_flags_unknown_fields() {
        let svc = service(&["container_name", "image", "custom_field"]);
        let violations = check_field_order(&svc, &default_order(), true);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "custom_field");
        assert_eq!(
            violations[0].message,
            "field 'custom_field' is not allowed in strict mode"
        );
        assert_eq!(violations[0].expected, None);
    }

    #[test]
    fn test_strict_mode_without_unknown_fields() {
        let svc = service(&["container_name", "image"]);
        assert!(check_field_order(&svc, &default_order(), true).is_empty());
    }

    #[test]
    fn test_custom_order() {
        let order: Vec<String> = vec!["image".into(), "container_name".into()];
        let svc = service(&["image", "container_name"]);
        assert!(check_field_order(&svc, &order, false).is_empty());
    }

    #[test]
    fn test_violation_points_at_field() {
        let yaml = r#"
services:
  web:
    image: nginx
    container_name: web
"#;
        let doc = parse_document(yaml).unwrap();
        let violations = check_field_order(doc.service("web").unwrap(), &default_order(), false);
        assert_eq!(violations[0].position, Some(Position::new(4, 5)));
        assert_eq!(violations[1].position, Some(Position::new(5, 5)));
    }
}
