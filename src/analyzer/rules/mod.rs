//! Compliance rules.
//!
//! - [`field_order`] - canonical field order and strict mode
//! - [`alphabetization`] - sorted entries for `environment`, `volumes` and `labels`

pub mod alphabetization;
pub mod field_order;

pub use alphabetization::check_alphabetization;
pub use field_order::{OrderMismatch, check_field_order, is_in_canonical_order, order_mismatches};

use crate::analyzer::parser::FieldValue;

/// Fields whose entries must be kept in alphabetical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialField {
    Environment,
    Volumes,
    Labels,
}

impl SpecialField {
    pub const ALL: [SpecialField; 3] = [Self::Environment, Self::Volumes, Self::Labels];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "environment" => Some(Self::Environment),
            "volumes" => Some(Self::Volumes),
            "labels" => Some(Self::Labels),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::Volumes => "volumes",
            Self::Labels => "labels",
        }
    }

    /// Message reported when the field is out of order.
    pub fn violation_message(&self) -> &'static str {
        match self {
            Self::Environment => "environment variables are not alphabetized",
            Self::Volumes => "volumes are not alphabetized by source path",
            Self::Labels => "labels are not alphabetized",
        }
    }

    /// Separator between key and value in the short string syntax.
    fn separator(&self) -> char {
        match self {
            Self::Volumes => ':',
            Self::Environment | Self::Labels => '=',
        }
    }

    /// Derive the sort key of one entry of this field.
    pub fn entry_key<'a>(&self, entry: &'a FieldValue) -> EntryKey<'a> {
        match entry {
            FieldValue::String(s) => {
                EntryKey::Text(s.split_once(self.separator()).map_or(s.as_str(), |(key, _)| key))
            }
            FieldValue::Mapping(entries) => match self {
                Self::Volumes => entry
                    .get("source")
                    .and_then(FieldValue::as_str)
                    .map_or(EntryKey::Opaque, EntryKey::Named),
                Self::Environment | Self::Labels if entries.len() == 1 => {
                    EntryKey::Named(entries[0].0.as_str())
                }
                _ => EntryKey::Opaque,
            },
            other => other.scalar_text().map_or(EntryKey::Opaque, EntryKey::Scalar),
        }
    }

    /// Sort keys of the field's entries, in declaration order.
    ///
    /// Mapping-valued `environment` and `labels` are keyed by their mapping
    /// keys. Values that are neither sequences nor such mappings have no
    /// entries.
    pub fn sort_keys(&self, value: &FieldValue) -> Vec<String> {
        match value {
            FieldValue::Sequence(items) => items
                .iter()
                .map(|item| self.entry_key(item).sort_key())
                .collect(),
            FieldValue::Mapping(entries) if *self != Self::Volumes => {
                entries.iter().map(|(key, _)| key.to_lowercase()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Whether the field's entries are in non-decreasing key order.
    pub fn is_alphabetized(&self, value: &FieldValue) -> bool {
        self.sort_keys(value).windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// Return the value with its entries stably sorted, or `None` if it is
    /// already in order.
    pub fn alphabetize(&self, value: &FieldValue) -> Option<FieldValue> {
        if self.is_alphabetized(value) {
            return None;
        }

        match value {
            FieldValue::Sequence(items) => {
                let mut sorted = items.clone();
                sorted.sort_by_cached_key(|item| self.entry_key(item).sort_key());
                Some(FieldValue::Sequence(sorted))
            }
            FieldValue::Mapping(entries) => {
                let mut sorted = entries.clone();
                sorted.sort_by_cached_key(|(key, _)| key.to_lowercase());
                Some(FieldValue::Mapping(sorted))
            }
            _ => None,
        }
    }
}

/// How a single entry of a special field is keyed for sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKey<'a> {
    /// Short string syntax; holds the part before the first separator.
    Text(&'a str),
    /// Single-key mapping entry, or the `source` of a long-syntax volume.
    Named(&'a str),
    /// Number or boolean entry, by its rendered text.
    Scalar(String),
    /// Entry without a usable key. Sorts first.
    Opaque,
}

impl EntryKey<'_> {
    /// Case-insensitive comparison key.
    pub fn sort_key(&self) -> String {
        match self {
            Self::Text(s) | Self::Named(s) => s.to_lowercase(),
            Self::Scalar(s) => s.to_lowercase(),
            Self::Opaque => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> FieldValue {
        FieldValue::Sequence(items.iter().map(|s| FieldValue::from(*s)).collect())
    }

    #[test]
    fn test_entry_keys() {
        let env = SpecialField::Environment;
        assert_eq!(env.entry_key(&"A=1=2".into()), EntryKey::Text("A"));
        assert_eq!(env.entry_key(&"FLAG".into()), EntryKey::Text("FLAG"));
        assert_eq!(env.entry_key(&FieldValue::Integer(7)), EntryKey::Scalar("7".into()));

        let single = FieldValue::Mapping(vec![("KEY".into(), "v".into())]);
        assert_eq!(env.entry_key(&single), EntryKey::Named("KEY"));

        let volumes = SpecialField::Volumes;
        assert_eq!(volumes.entry_key(&"./data:/data:ro".into()), EntryKey::Text("./data"));
        let long = FieldValue::Mapping(vec![
            ("type".into(), "bind".into()),
            ("source".into(), "./src".into()),
            ("target".into(), "/app".into()),
        ]);
        assert_eq!(volumes.entry_key(&long), EntryKey::Named("./src"));
        assert_eq!(env.entry_key(&long), EntryKey::Opaque);
        assert_eq!(env.entry_key(&FieldValue::Null), EntryKey::Opaque);
    }

    #[test]
    fn test_case_insensitive_order() {
        let env = strings(&["zzz=1", "AAA=2", "BBB=3"]);
        assert!(!SpecialField::Environment.is_alphabetized(&env));
        assert_eq!(
            SpecialField::Environment.alphabetize(&env),
            Some(strings(&["AAA=2", "BBB=3", "zzz=1"]))
        );

        assert!(SpecialField::Environment.is_alphabetized(&strings(&["aaa=1", "BBB=2", "ccc=3"])));
    }

    #[test]
    fn test_short_lists_always_alphabetized() {
        for field in SpecialField::ALL {
            assert!(field.is_alphabetized(&strings(&[])));
            assert!(field.is_alphabetized(&strings(&["z=1"])));
            assert_eq!(field.alphabetize(&strings(&["z:/z"])), None);
        }
    }

    #[test]
    fn test_volumes_sorted_by_source() {
        let volumes = strings(&["./data:/data", "./config:/config", "./logs:/logs"]);
        assert!(!SpecialField::Volumes.is_alphabetized(&volumes));
        assert_eq!(
            SpecialField::Volumes.alphabetize(&volumes),
            Some(strings(&["./config:/config", "./data:/data", "./logs:/logs"]))
        );

        let absolute = strings(&["/zzz:/c/zzz", "/aaa:/c/aaa", "/mmm:/c/mmm"]);
        assert_eq!(
            SpecialField::Volumes.alphabetize(&absolute),
            Some(strings(&["/aaa:/c/aaa", "/mmm:/c/mmm", "/zzz:/c/zzz"]))
        );
    }

    #[test]
    fn test_mapping_environment() {
        let env = FieldValue::Mapping(vec![
            ("ZED".into(), "1".into()),
            ("alpha".into(), FieldValue::Null),
        ]);
        assert!(!SpecialField::Environment.is_alphabetized(&env));
        let sorted = SpecialField::Environment.alphabetize(&env).unwrap();
        assert_eq!(sorted.as_mapping().unwrap()[0].0, "alpha");

        // a mapping is not a valid volumes list and has no entries to sort
        assert!(SpecialField::Volumes.is_alphabetized(&env));
    }

    #[test]
    fn test_stable_sort_keeps_equal_keys() {
        let env = strings(&["b=1", "A=first", "a=second"]);
        let sorted = SpecialField::Environment.alphabetize(&env).unwrap();
        assert_eq!(sorted, strings(&["A=first", "a=second", "b=1"]));
    }

    #[test]
    fn test_non_collection_values() {
        assert!(SpecialField::Labels.is_alphabetized(&"single".into()));
        assert_eq!(SpecialField::Labels.alphabetize(&FieldValue::Null), None);
    }
}
