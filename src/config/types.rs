use serde::Deserialize;
use std::collections::BTreeMap;

use crate::analyzer::{Policy, SpecialField};

/// On-disk configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    #[serde(alias = "canonical_order")]
    pub field_order: Vec<String>,
    pub alphabetization: AlphabetizationConfig,
    pub strict: bool,
    pub exclude: Vec<String>,
    pub service_overrides: BTreeMap<String, ServiceOverride>,
}

/// Alphabetization switches; a missing key keeps the default (enabled)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AlphabetizationConfig {
    pub environment: Option<bool>,
    pub volumes: Option<bool>,
    pub labels: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceOverride {
    pub field_order: Vec<String>,
}

impl ConfigFile {
    /// Build the run policy, falling back to defaults for anything unset.
    pub fn into_policy(self) -> Policy {
        let mut policy = Policy::default()
            .with_field_order(self.field_order)
            .with_strict(self.strict)
            .with_excludes(self.exclude);

        let switches = [
            (SpecialField::Environment, self.alphabetization.environment),
            (SpecialField::Volumes, self.alphabetization.volumes),
            (SpecialField::Labels, self.alphabetization.labels),
        ];
        for (field, enabled) in switches {
            if let Some(enabled) = enabled {
                policy = policy.with_alphabetization(field, enabled);
            }
        }

        for (service, service_override) in self.service_overrides {
            policy = policy.with_override(service, service_override.field_order);
        }

        policy
    }
}
