//! Automatic fixing.
//!
//! The rewriter produces a corrected copy of each service: canonical fields
//! in canonical order, then every other field in its original relative
//! order, with enabled special fields alphabetized. Services that need no
//! change are returned untouched.

use std::collections::HashSet;

use crate::analyzer::parser::{
    Document, Field, ParseError, SerializationError, Service, parse_document, serialize,
};
use crate::analyzer::policy::Policy;
use crate::analyzer::rules::{SpecialField, is_in_canonical_order};
use crate::analyzer::types::FixRecord;

/// Error type for fixing.
#[derive(Debug, thiserror::Error)]
pub enum FixError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Serialize(#[from] SerializationError),
}

/// Corrected fields of one service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceFix {
    pub fields: Vec<Field>,
    /// True when at least one change was made.
    pub fixed: bool,
    /// Alphabetization records in output order, then the reorder record.
    pub records: Vec<FixRecord>,
}

/// Compute the corrected field sequence of a service.
pub fn fix(service: &Service, policy: &Policy) -> ServiceFix {
    let order = policy.canonical_order_for(&service.name);
    let known: HashSet<&str> = order.iter().map(String::as_str).collect();
    let mut records = Vec::new();

    let canonical = order.iter().filter_map(|name| service.field(name));
    let remainder = service
        .fields
        .iter()
        .filter(|field| !known.contains(field.name.as_str()));

    let fields: Vec<Field> = canonical
        .chain(remainder)
        .map(|field| alphabetize_field(&service.name, field, policy, &mut records))
        .collect();

    if !is_in_canonical_order(service, order) {
        records.push(FixRecord::reordered(&service.name));
    }

    if records.is_empty() {
        return ServiceFix {
            fields: service.fields.clone(),
            fixed: false,
            records,
        };
    }

    ServiceFix {
        fields,
        fixed: true,
        records,
    }
}

fn alphabetize_field(
    service: &str,
    field: &Field,
    policy: &Policy,
    records: &mut Vec<FixRecord>,
) -> Field {
    if let Some(special) = SpecialField::from_name(&field.name)
        && policy.alphabetization().is_enabled(special)
        && let Some(sorted) = special.alphabetize(&field.value)
    {
        records.push(FixRecord::alphabetized(service, &field.name));
        return Field {
            value: sorted,
            ..field.clone()
        };
    }
    field.clone()
}

/// Fix every service of a document in place.
///
/// Only the definition that takes effect is fixed: a service redefined in a
/// later group is left as written in the earlier one. Returns the records of
/// all changes, grouped by service in document order.
pub fn fix_document(document: &mut Document, policy: &Policy) -> Vec<FixRecord> {
    let names: Vec<String> = document
        .groups
        .iter()
        .flat_map(|g| g.services())
        .map(|s| s.name.clone())
        .collect();

    let mut records = Vec::new();
    let services = document.groups.iter_mut().flat_map(|g| g.services_mut());
    for (idx, service) in services.enumerate() {
        if names[idx + 1..].contains(&service.name) {
            continue;
        }
        let outcome = fix(service, policy);
        if outcome.fixed {
            service.fields = outcome.fields;
            records.extend(outcome.records);
        }
    }
    records
}

/// Result of fixing a compose file's content.
#[derive(Debug, Clone)]
pub struct FixResult {
    /// True when the content was changed.
    pub fixed: bool,
    pub changes: Vec<FixRecord>,
    /// The corrected content, or the input unchanged when nothing was fixed.
    pub content: String,
}

/// Parse, fix and re-serialize compose file content.
pub fn fix_content(content: &str, policy: &Policy) -> Result<FixResult, FixError> {
    let mut document = parse_document(content)?;
    let changes = fix_document(&mut document, policy);

    if changes.is_empty() {
        return Ok(FixResult {
            fixed: false,
            changes,
            content: content.to_string(),
        });
    }

    Ok(FixResult {
        fixed: true,
        content: serialize(&document)?,
        changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::check::{CheckScope, check, validate_content};
    use crate::analyzer::parser::FieldValue;

    fn service(fields: &[&str]) -> Service {
        Service::new(
            "web",
            fields.iter().map(|name| Field::new(*name, "x")).collect(),
        )
    }

    #[test]
    fn test_fix_reorders_and_keeps_unknown_fields() {
        let svc = service(&["command", "image", "container_name", "depends_on"]);
        let outcome = fix(&svc, &Policy::default());

        assert!(outcome.fixed);
        let names: Vec<&str> = outcome.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["container_name", "image", "command", "depends_on"]);
        assert_eq!(outcome.records, vec![FixRecord::reordered("web")]);
    }

    #[test]
    fn test_fix_compliant_service_is_unchanged() {
        // `command` is unknown and precedes canonical fields; no reorder is needed
        let svc = service(&["command", "container_name", "image"]);
        let outcome = fix(&svc, &Policy::default());

        assert!(!outcome.fixed);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.fields, svc.fields);
    }

    #[test]
    fn test_fix_alphabetizes_before_reorder_record() {
        let svc = Service::new(
            "api",
            vec![
                Field::new("image", "api"),
                Field::new(
                    "environment",
                    FieldValue::Sequence(vec!["zzz=1".into(), "AAA=2".into(), "BBB=3".into()]),
                ),
                Field::new("container_name", "api"),
            ],
        );
        let outcome = fix(&svc, &Policy::default());

        assert_eq!(
            outcome.records,
            vec![
                FixRecord::alphabetized("api", "environment"),
                FixRecord::reordered("api"),
            ]
        );
        assert_eq!(
            outcome.fields[2].value,
            FieldValue::Sequence(vec!["AAA=2".into(), "BBB=3".into(), "zzz=1".into()])
        );
    }

    #[test]
    fn test_fix_respects_disabled_alphabetization() {
        let svc = Service::new(
            "web",
            vec![Field::new(
                "labels",
                FieldValue::Sequence(vec!["b=1".into(), "a=2".into()]),
            )],
        );
        let policy = Policy::default().with_alphabetization(SpecialField::Labels, false);
        assert!(!fix(&svc, &policy).fixed);

        let svc = Service::new(
            "web",
            vec![Field::new(
                "environment",
                FieldValue::Sequence(vec!["zzz=1".into(), "AAA=2".into()]),
            )],
        );
        let policy = Policy::default().with_alphabetization(SpecialField::Environment, false);
        let outcome = fix(&svc, &policy);
        assert!(!outcome.fixed);
        assert!(outcome.records.is_empty());
        assert!(check(&svc, &policy).is_empty());
    }

    #[test]
    fn test_fix_document_skips_shadowed_definitions() {
        let yaml = r#"
services:
  web:
    image: old
    container_name: web
---
services:
  web:
    image: new
    container_name: web
"#;
        let mut doc = parse_document(yaml).unwrap();
        let records = fix_document(&mut doc, &Policy::default());

        assert_eq!(records, vec![FixRecord::reordered("web")]);
        let first = doc.groups[0].services().next().unwrap();
        assert_eq!(first.field_names(), vec!["image", "container_name"]);
        let last = doc.service("web").unwrap();
        assert_eq!(last.field_names(), vec!["container_name", "image"]);
        assert_eq!(last.get("image"), Some(&FieldValue::from("new")));
    }

    #[test]
    fn test_fix_content_keeps_string_values_exact() {
        let yaml = r#"
services:
  app:
    image: app
    container_name: app
    command: "x\n\n"
    entrypoint: "  a\nb"
    user: |+
      keep

"#;
        let result = fix_content(yaml, &Policy::default()).unwrap();
        assert!(result.fixed);

        let doc = parse_document(&result.content).unwrap();
        let app = doc.service("app").unwrap();
        assert_eq!(app.field_names(), vec!["container_name", "image", "user", "command", "entrypoint"]);
        assert_eq!(app.get("command"), Some(&FieldValue::from("x\n\n")));
        assert_eq!(app.get("entrypoint"), Some(&FieldValue::from("  a\nb")));
        assert_eq!(app.get("user"), Some(&FieldValue::from("keep\n\n")));
    }

    #[test]
    fn test_fix_content_produces_valid_output() {
        let yaml = r#"
services:
  web:
    image: nginx
    restart: always
    container_name: web
    volumes:
      - ./data:/data
      - ./config:/config
    environment:
      - ZED=1
      - ALPHA=2
networks:
  default: {}
"#;
        let policy = Policy::default();
        let result = fix_content(yaml, &policy).unwrap();
        assert!(result.fixed);
        assert_eq!(result.changes.len(), 3);

        let check = validate_content(&result.content, "f.yml", &policy, CheckScope::All).unwrap();
        assert!(check.is_valid());
        assert!(result.content.contains("networks:"));

        // a second pass finds nothing to do
        let again = fix_content(&result.content, &policy).unwrap();
        assert!(!again.fixed);
        assert_eq!(again.content, result.content);
    }

    #[test]
    fn test_fix_content_unchanged_input_is_returned_verbatim() {
        let yaml = "# keep me\nservices:\n  web:\n    image: nginx\n";
        let result = fix_content(yaml, &Policy::default()).unwrap();
        assert!(!result.fixed);
        assert_eq!(result.content, yaml);
    }

    #[test]
    fn test_fix_content_parse_error() {
        assert!(matches!(
            fix_content("services: [", &Policy::default()),
            Err(FixError::Parse(_))
        ));
    }
}
