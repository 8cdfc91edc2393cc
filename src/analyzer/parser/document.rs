//! Docker Compose document model.
//!
//! Unlike a generic YAML value, every mapping here is an ordered association
//! list: the order in which a service declares its fields (and in which an
//! `environment` or `labels` mapping declares its keys) is exactly the signal
//! the checker inspects, so it must survive decoding.

use std::collections::HashMap;

use yaml_rust2::{Yaml, YamlLoader};

use crate::analyzer::parser::SourceMap;
use crate::analyzer::types::Position;

/// Error type for parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("YAML parse error: {0}")]
    YamlError(String),
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

/// A decoded YAML value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    /// Kept in its source spelling so re-emitting does not change precision.
    Float(String),
    Boolean(bool),
    Null,
    Sequence(Vec<FieldValue>),
    Mapping(Vec<(String, FieldValue)>),
}

impl FieldValue {
    /// Decode a loaded YAML node.
    pub fn from_yaml(yaml: &Yaml) -> Result<Self, ParseError> {
        Ok(match yaml {
            Yaml::String(s) => Self::String(s.clone()),
            Yaml::Integer(i) => Self::Integer(*i),
            Yaml::Real(r) => Self::Float(r.clone()),
            Yaml::Boolean(b) => Self::Boolean(*b),
            Yaml::Null => Self::Null,
            Yaml::Array(items) => Self::Sequence(
                items
                    .iter()
                    .map(Self::from_yaml)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Yaml::Hash(hash) => {
                let mut entries = Vec::with_capacity(hash.len());
                for (key, value) in hash {
                    entries.push((key_text(key)?, Self::from_yaml(value)?));
                }
                Self::Mapping(entries)
            }
            Yaml::Alias(_) | Yaml::BadValue => {
                return Err(ParseError::InvalidStructure(
                    "unresolved alias or invalid value".to_string(),
                ));
            }
        })
    }

    /// The value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[FieldValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(String, FieldValue)]> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a key in a mapping value.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Text of a non-null scalar.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(r) => Some(r.clone()),
            Self::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// A single `name: value` pair of a service.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
    /// Position of the key in the source.
    pub position: Option<Position>,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            position: None,
        }
    }
}

/// A service definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Service {
    /// Service name.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
    /// Position of the service key.
    pub position: Option<Position>,
}

impl Service {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            position: None,
        }
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.field(name).map(|f| &f.value)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// One top-level entry of a YAML document.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// The `services` mapping.
    Services(Vec<Service>),
    /// Any other top-level key, carried through untouched.
    Entry { key: String, value: FieldValue },
}

/// One YAML document of a (possibly multi-document) compose file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceGroup {
    /// Top-level entries in declaration order.
    pub sections: Vec<Section>,
}

impl ServiceGroup {
    /// Services of this group, in declaration order.
    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.sections
            .iter()
            .filter_map(|section| match section {
                Section::Services(services) => Some(services),
                Section::Entry { .. } => None,
            })
            .flatten()
    }

    pub fn services_mut(&mut self) -> impl Iterator<Item = &mut Service> {
        self.sections
            .iter_mut()
            .filter_map(|section| match section {
                Section::Services(services) => Some(services),
                Section::Entry { .. } => None,
            })
            .flatten()
    }
}

/// Parsed compose file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub groups: Vec<ServiceGroup>,
}

impl Document {
    /// All services across groups as one name-keyed view.
    ///
    /// A service redefined in a later group replaces the earlier definition
    /// (last write wins); names keep the position where they first appeared.
    pub fn services(&self) -> Vec<&Service> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut flattened: Vec<&Service> = Vec::new();

        for service in self.groups.iter().flat_map(ServiceGroup::services) {
            match index.get(service.name.as_str()) {
                Some(&slot) => flattened[slot] = service,
                None => {
                    index.insert(service.name.as_str(), flattened.len());
                    flattened.push(service);
                }
            }
        }

        flattened
    }

    /// Look up a service in the flattened view.
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.groups
            .iter()
            .rev()
            .find_map(|group| group.services().find(|s| s.name == name))
    }
}

/// Parse a compose file into a document.
pub fn parse_document(content: &str) -> Result<Document, ParseError> {
    let docs =
        YamlLoader::load_from_str(content).map_err(|e| ParseError::YamlError(e.to_string()))?;

    let source_map = SourceMap::new(content);
    let groups = docs
        .iter()
        .enumerate()
        .map(|(idx, doc)| parse_group(doc, idx, &source_map))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Document { groups })
}

fn parse_group(doc: &Yaml, doc_idx: usize, source_map: &SourceMap) -> Result<ServiceGroup, ParseError> {
    let hash = match doc {
        Yaml::Hash(h) => h,
        Yaml::Null => return Ok(ServiceGroup::default()),
        _ => {
            return Err(ParseError::InvalidStructure(
                "Root must be a mapping".to_string(),
            ));
        }
    };

    let mut sections = Vec::with_capacity(hash.len());
    for (key, value) in hash {
        let key = key_text(key)?;
        if key == "services" {
            sections.push(Section::Services(parse_services(value, doc_idx, source_map)?));
        } else {
            sections.push(Section::Entry {
                key,
                value: FieldValue::from_yaml(value)?,
            });
        }
    }

    Ok(ServiceGroup { sections })
}

fn parse_services(
    yaml: &Yaml,
    doc_idx: usize,
    source_map: &SourceMap,
) -> Result<Vec<Service>, ParseError> {
    let hash = match yaml {
        Yaml::Hash(h) => h,
        Yaml::Null => return Ok(Vec::new()),
        _ => {
            return Err(ParseError::InvalidStructure(
                "'services' must be a mapping".to_string(),
            ));
        }
    };

    let mut services = Vec::with_capacity(hash.len());
    for (name_yaml, body) in hash {
        let name = key_text(name_yaml)?;
        services.push(parse_service(&name, body, doc_idx, source_map)?);
    }

    Ok(services)
}

/// Parse a service definition.
fn parse_service(
    name: &str,
    yaml: &Yaml,
    doc_idx: usize,
    source_map: &SourceMap,
) -> Result<Service, ParseError> {
    let position = source_map.locate(doc_idx, &["services", name]);

    let hash = match yaml {
        Yaml::Hash(h) => h,
        Yaml::Null => {
            return Ok(Service {
                name: name.to_string(),
                fields: Vec::new(),
                position,
            });
        }
        _ => {
            return Err(ParseError::InvalidStructure(format!(
                "Service '{}' must be a mapping",
                name
            )));
        }
    };

    let mut fields = Vec::with_capacity(hash.len());
    for (key, value) in hash {
        let field_name = key_text(key)?;
        let field_position = source_map.locate(doc_idx, &["services", name, &field_name]);
        fields.push(Field {
            value: FieldValue::from_yaml(value)?,
            position: field_position,
            name: field_name,
        });
    }

    Ok(Service {
        name: name.to_string(),
        fields,
        position,
    })
}

/// Render a mapping key as text.
fn key_text(key: &Yaml) -> Result<String, ParseError> {
    match key {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(r) => Ok(r.clone()),
        Yaml::Boolean(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        _ => Err(ParseError::InvalidStructure(
            "complex mapping keys are not supported".to_string(),
        )),
    }
}
