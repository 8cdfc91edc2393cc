//! Serialization of a [`Document`] back to YAML text.
//!
//! Output preserves key order at every level. Comments and the original
//! quoting style are not retained. Strings are always emitted as flow
//! scalars, with escapes for newlines and leading or trailing blanks.

use yaml_rust2::yaml::Hash;
use yaml_rust2::{Yaml, YamlEmitter};

use crate::analyzer::parser::document::{
    Document, FieldValue, Section, Service, ServiceGroup, parse_document,
};

/// Error type for serialization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializationError {
    #[error("YAML emit error: {0}")]
    Emit(String),
}

/// Render a document as YAML text.
///
/// A single-document file is emitted without a leading `---` marker;
/// multi-document files separate each document with one. The output is
/// parsed again and must reproduce `document` exactly.
pub fn serialize(document: &Document) -> Result<String, SerializationError> {
    let mut rendered = Vec::with_capacity(document.groups.len());

    for group in &document.groups {
        let yaml = group_to_yaml(group);
        let mut out = String::new();
        {
            let mut emitter = YamlEmitter::new(&mut out);
            emitter
                .dump(&yaml)
                .map_err(|e| SerializationError::Emit(e.to_string()))?;
        }
        let body = out.strip_prefix("---").unwrap_or(&out).trim_start_matches([' ', '\n']);
        rendered.push(format!("{}\n", body.trim_end()));
    }

    let output = rendered.join("---\n");
    verify_round_trip(document, &output)?;
    Ok(output)
}

fn verify_round_trip(document: &Document, output: &str) -> Result<(), SerializationError> {
    let reparsed = parse_document(output)
        .map_err(|e| SerializationError::Emit(format!("output does not parse: {}", e)))?;

    if strip_positions(reparsed) != strip_positions(document.clone()) {
        return Err(SerializationError::Emit(
            "output does not reproduce the document".to_string(),
        ));
    }
    Ok(())
}

fn strip_positions(mut document: Document) -> Document {
    for service in document.groups.iter_mut().flat_map(|g| g.services_mut()) {
        service.position = None;
        for field in &mut service.fields {
            field.position = None;
        }
    }
    document
}

fn group_to_yaml(group: &ServiceGroup) -> Yaml {
    if group.sections.is_empty() {
        return Yaml::Null;
    }

    let mut root = Hash::new();
    for section in &group.sections {
        match section {
            Section::Services(services) => {
                let mut hash = Hash::new();
                for service in services {
                    hash.insert(Yaml::String(service.name.clone()), service_to_yaml(service));
                }
                root.insert(Yaml::String("services".to_string()), Yaml::Hash(hash));
            }
            Section::Entry { key, value } => {
                root.insert(Yaml::String(key.clone()), value.to_yaml());
            }
        }
    }
    Yaml::Hash(root)
}

fn service_to_yaml(service: &Service) -> Yaml {
    if service.fields.is_empty() {
        return Yaml::Null;
    }

    let mut hash = Hash::new();
    for field in &service.fields {
        hash.insert(Yaml::String(field.name.clone()), field.value.to_yaml());
    }
    Yaml::Hash(hash)
}

impl FieldValue {
    /// Convert back into a yaml-rust2 node for emission.
    pub fn to_yaml(&self) -> Yaml {
        match self {
            Self::String(s) => Yaml::String(s.clone()),
            Self::Integer(i) => Yaml::Integer(*i),
            Self::Float(r) => Yaml::Real(r.clone()),
            Self::Boolean(b) => Yaml::Boolean(*b),
            Self::Null => Yaml::Null,
            Self::Sequence(items) => Yaml::Array(items.iter().map(Self::to_yaml).collect()),
            Self::Mapping(entries) => {
                let mut hash = Hash::new();
                for (key, value) in entries {
                    hash.insert(Yaml::String(key.clone()), value.to_yaml());
                }
                Yaml::Hash(hash)
            }
        }
    }
}
