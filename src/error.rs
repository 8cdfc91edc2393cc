//! Error types for compose-validator
//!
//! Every variant that concerns a file carries its path.

use std::path::PathBuf;

use thiserror::Error;

use crate::analyzer::{FixError, ParseError};
use crate::config::ConfigError;

/// Errors that can occur while validating or fixing compose files.
#[derive(Debug, Error)]
pub enum ComposeValidatorError {
    /// Configuration could not be loaded
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Input is not valid YAML or not a compose document
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Fixed content could not be produced
    #[error("failed to fix {}: {source}", path.display())]
    Fix {
        path: PathBuf,
        #[source]
        source: FixError,
    },

    /// Reading or writing a file failed
    #[error("failed to {action} file {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file pattern is not a valid glob
    #[error("invalid pattern {pattern}: {message}")]
    Pattern { pattern: String, message: String },
}

/// Result type alias for compose-validator operations
pub type Result<T> = std::result::Result<T, ComposeValidatorError>;
