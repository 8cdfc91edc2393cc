//! Validation policy.
//!
//! A [`Policy`] is built once (from defaults or a config file) and then shared
//! read-only by the checker and the rewriter across all files of a run.

use std::collections::HashMap;
use std::path::{Component, Path};

use glob::{MatchOptions, Pattern};

use crate::analyzer::rules::SpecialField;

/// Built-in canonical field order.
pub const DEFAULT_FIELD_ORDER: &[&str] = &[
    "container_name",
    "image",
    "build",
    "user",
    "environment",
    "env_file",
    "networks",
    "network_mode",
    "ports",
    "devices",
    "healthcheck",
    "restart",
    "cap_add",
    "privileged",
    "extra_hosts",
    "volumes",
    "labels",
];

/// Which special fields must be alphabetized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphabetizationRules {
    pub environment: bool,
    pub volumes: bool,
    pub labels: bool,
}

impl Default for AlphabetizationRules {
    fn default() -> Self {
        Self {
            environment: true,
            volumes: true,
            labels: true,
        }
    }
}

impl AlphabetizationRules {
    pub fn is_enabled(&self, field: SpecialField) -> bool {
        match field {
            SpecialField::Environment => self.environment,
            SpecialField::Volumes => self.volumes,
            SpecialField::Labels => self.labels,
        }
    }

    fn set(&mut self, field: SpecialField, enabled: bool) {
        match field {
            SpecialField::Environment => self.environment = enabled,
            SpecialField::Volumes => self.volumes = enabled,
            SpecialField::Labels => self.labels = enabled,
        }
    }
}

/// The rules a compose file is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    field_order: Vec<String>,
    alphabetization: AlphabetizationRules,
    strict: bool,
    exclude: Vec<String>,
    service_overrides: HashMap<String, Vec<String>>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            field_order: DEFAULT_FIELD_ORDER.iter().map(|s| s.to_string()).collect(),
            alphabetization: AlphabetizationRules::default(),
            strict: false,
            exclude: Vec::new(),
            service_overrides: HashMap::new(),
        }
    }
}

impl Policy {
    /// Replace the canonical field order. An empty list keeps the current order.
    pub fn with_field_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let order = dedup_order(order);
        if !order.is_empty() {
            self.field_order = order;
        }
        self
    }

    /// Enable or disable alphabetization of one special field.
    pub fn with_alphabetization(mut self, field: SpecialField, enabled: bool) -> Self {
        self.alphabetization.set(field, enabled);
        self
    }

    pub fn with_alphabetization_rules(mut self, rules: AlphabetizationRules) -> Self {
        self.alphabetization = rules;
        self
    }

    /// Set strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Add an exclude pattern.
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Set multiple exclude patterns.
    pub fn with_excludes(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Give one service its own field order. Empty overrides are ignored.
    pub fn with_override<I, S>(mut self, service: impl Into<String>, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let order = dedup_order(order);
        if !order.is_empty() {
            self.service_overrides.insert(service.into(), order);
        }
        self
    }

    /// The global canonical order.
    pub fn canonical_order(&self) -> &[String] {
        &self.field_order
    }

    /// The canonical order that applies to `service`.
    pub fn canonical_order_for(&self, service: &str) -> &[String] {
        self.service_overrides
            .get(service)
            .map(Vec::as_slice)
            .unwrap_or(&self.field_order)
    }

    pub fn alphabetization(&self) -> AlphabetizationRules {
        self.alphabetization
    }

    /// Whether the named field must be alphabetized.
    pub fn alphabetization_required(&self, field: &str) -> bool {
        SpecialField::from_name(field).is_some_and(|f| self.alphabetization.is_enabled(f))
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn overrides(&self) -> &HashMap<String, Vec<String>> {
        &self.service_overrides
    }

    /// Check if a file path should be excluded.
    ///
    /// Patterns starting with `**/` match any single path component (a
    /// trailing `/**` is ignored). Other patterns are matched against the
    /// whole path, then against the file name. Invalid patterns never match.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        self.exclude.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix("**/") {
                let suffix = suffix.strip_suffix("/**").unwrap_or(suffix);
                let suffix = suffix.strip_suffix('/').unwrap_or(suffix);
                let Ok(glob) = Pattern::new(suffix) else {
                    return false;
                };
                return path.components().any(|component| match component {
                    Component::Normal(part) => {
                        glob.matches_with(&part.to_string_lossy(), match_options())
                    }
                    _ => false,
                });
            }

            Pattern::new(pattern)
                .map(|glob| {
                    glob.matches_with(&path_str, match_options())
                        || glob.matches_with(&file_name, match_options())
                })
                .unwrap_or(false)
        })
    }
}

fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

/// Keep the first occurrence of each field name.
fn dedup_order<I, S>(order: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for name in order {
        let name = name.into();
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = Policy::default();
        assert_eq!(policy.canonical_order().len(), 17);
        assert_eq!(policy.canonical_order()[0], "container_name");
        assert_eq!(policy.canonical_order()[16], "labels");
        assert!(!policy.is_strict());
        assert!(policy.alphabetization_required("environment"));
        assert!(policy.alphabetization_required("volumes"));
        assert!(policy.alphabetization_required("labels"));
        assert!(!policy.alphabetization_required("ports"));
    }

    #[test]
    fn test_canonical_order_for_override() {
        let policy = Policy::default().with_override("db", ["image", "container_name"]);
        assert_eq!(policy.canonical_order_for("db"), &["image", "container_name"]);
        assert_eq!(policy.canonical_order_for("web")[0], "container_name");
    }

    #[test]
    fn test_empty_orders_fall_back() {
        let policy = Policy::default()
            .with_field_order(Vec::<String>::new())
            .with_override("db", Vec::<String>::new());
        assert_eq!(policy.canonical_order().len(), DEFAULT_FIELD_ORDER.len());
        assert!(policy.overrides().is_empty());
    }

    #[test]
    fn test_field_order_dedup() {
        let policy = Policy::default().with_field_order(["image", "ports", "image"]);
        assert_eq!(policy.canonical_order(), &["image", "ports"]);
    }

    #[test]
    fn test_disable_alphabetization() {
        let policy = Policy::default().with_alphabetization(SpecialField::Volumes, false);
        assert!(!policy.alphabetization_required("volumes"));
        assert!(policy.alphabetization_required("labels"));
    }

    #[test]
    fn test_is_excluded() {
        let policy = Policy::default()
            .with_exclude("**/test/**")
            .with_exclude("*.tmp")
            .with_exclude("docker-compose.override.yml");

        assert!(policy.is_excluded(Path::new("test/docker-compose.yml")));
        assert!(policy.is_excluded(Path::new("/path/to/test/docker-compose.yml")));
        assert!(policy.is_excluded(Path::new("backup.yml.tmp")));
        assert!(policy.is_excluded(Path::new("configs/backup.yml.tmp")));
        assert!(policy.is_excluded(Path::new("docker-compose.override.yml")));
        assert!(policy.is_excluded(Path::new("app/docker-compose.override.yml")));

        assert!(!policy.is_excluded(Path::new("docker-compose.yml")));
        assert!(!policy.is_excluded(Path::new("tests/docker-compose.yml")));
    }

    #[test]
    fn test_invalid_exclude_pattern_never_matches() {
        let policy = Policy::default().with_exclude("[unclosed");
        assert!(!policy.is_excluded(Path::new("[unclosed")));
    }
}
