pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::analyzer::Policy;

/// Config file names, in order of priority
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".compose-validator.yaml",
    ".compose-validator.yml",
    "compose-validator.yaml",
    "compose-validator.yml",
];

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to get working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid exclude pattern '{pattern}' in {}: {message}", path.display())]
    InvalidPattern {
        path: PathBuf,
        pattern: String,
        message: String,
    },
}

/// Find a config file in `start` or the nearest ancestor that has one
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Load the policy from an explicit file, or discover one from the working
/// directory upwards. Without any config file the built-in defaults apply.
pub fn load_policy(explicit: Option<&Path>) -> Result<Policy, ConfigError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let cwd = std::env::current_dir().map_err(ConfigError::WorkingDirectory)?;
            find_config_file(&cwd)
        }
    };

    match path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            load_policy_from_file(&path)
        }
        None => {
            log::debug!("No configuration file found, using built-in defaults");
            Ok(Policy::default())
        }
    }
}

/// Load the policy from a YAML config file
pub fn load_policy_from_file(path: &Path) -> Result<Policy, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    policy_from_str(&content, path)
}

/// Parse config YAML. An empty document yields the defaults.
pub fn policy_from_str(content: &str, path: &Path) -> Result<Policy, ConfigError> {
    let parse_error = |e: serde_yaml::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(parse_error)?;
    let config: types::ConfigFile = if value.is_null() {
        types::ConfigFile::default()
    } else {
        serde_yaml::from_value(value).map_err(parse_error)?
    };

    for pattern in &config.exclude {
        let candidate = pattern.strip_prefix("**/").unwrap_or(pattern);
        if let Err(e) = glob::Pattern::new(candidate) {
            return Err(ConfigError::InvalidPattern {
                path: path.to_path_buf(),
                pattern: pattern.clone(),
                message: e.to_string(),
            });
        }
    }

    Ok(config.into_policy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::DEFAULT_FIELD_ORDER;
    use tempfile::tempdir;

    fn parse(yaml: &str) -> Result<Policy, ConfigError> {
        policy_from_str(yaml, Path::new("compose-validator.yml"))
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
field_order:
  - image
  - container_name
  - ports
alphabetization:
  environment: true
  volumes: false
strict: true
exclude:
  - "**/test/**"
service_overrides:
  db:
    field_order:
      - container_name
      - image
"#;
        let policy = parse(yaml).unwrap();
        assert_eq!(policy.canonical_order(), &["image", "container_name", "ports"]);
        assert!(policy.alphabetization_required("environment"));
        assert!(!policy.alphabetization_required("volumes"));
        assert!(policy.alphabetization_required("labels"));
        assert!(policy.is_strict());
        assert!(policy.is_excluded(Path::new("app/test/docker-compose.yml")));
        assert_eq!(policy.canonical_order_for("db"), &["container_name", "image"]);
        assert_eq!(policy.canonical_order_for("web")[0], "image");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let policy = parse("strict: true\n").unwrap();
        assert!(policy.is_strict());
        assert_eq!(policy.canonical_order().len(), DEFAULT_FIELD_ORDER.len());
        assert!(policy.alphabetization_required("volumes"));
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse("").unwrap(), Policy::default());
        assert_eq!(parse("# nothing here\n").unwrap(), Policy::default());
    }

    #[test]
    fn test_canonical_order_alias() {
        let policy = parse("canonical_order: [build, image]\n").unwrap();
        assert_eq!(policy.canonical_order(), &["build", "image"]);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(parse("strict: [1, 2"), Err(ConfigError::Parse { .. })));
        assert!(matches!(parse("strict: maybe\n"), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            parse("exclude: ['[oops']\n"),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("compose-validator.yml"), "strict: true\n").unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join("compose-validator.yml"));
    }

    #[test]
    fn test_find_config_file_priority() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("compose-validator.yml"), "").unwrap();
        fs::write(dir.path().join(".compose-validator.yaml"), "").unwrap();

        let found = find_config_file(dir.path()).unwrap();
        assert_eq!(found, dir.path().join(".compose-validator.yaml"));
    }

    #[test]
    fn test_load_policy_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.yml");
        fs::write(&path, "alphabetization:\n  labels: false\n").unwrap();

        let policy = load_policy(Some(&path)).unwrap();
        assert!(!policy.alphabetization_required("labels"));

        let missing = dir.path().join("missing.yml");
        assert!(matches!(load_policy(Some(&missing)), Err(ConfigError::Io { .. })));
    }
}
