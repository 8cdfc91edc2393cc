//! # Compose Validator
//!
//! A command-line tool that validates Docker Compose files against a
//! canonical service field order and checks that `environment`, `volumes`
//! and `labels` entries are alphabetized. Violations can be fixed in place.
//!
//! ## Features
//!
//! - **Field Order**: Canonical order with per-service overrides and a strict mode
//! - **Alphabetization**: Case-insensitive key ordering for special fields
//! - **Auto Fix**: Rewrites files without losing any field or entry
//! - **Config Discovery**: `.compose-validator.yaml` found from the working directory upwards
//! - **Multiple Formats**: Stylish terminal output, JSON, and GitHub Actions annotations
//!
//! ## Example
//!
//! ```rust,no_run
//! use compose_validator::analyzer::{CheckScope, Policy, validate_content};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let content = std::fs::read_to_string("docker-compose.yml")?;
//! let result = validate_content(&content, "docker-compose.yml", &Policy::default(), CheckScope::All)?;
//! println!("{} violation(s)", result.violations.len());
//! # Ok(())
//! # }
//! ```
//!
//! Fixed files are re-emitted from the parsed model, so comments and the
//! original quoting style are lost.

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;

// Re-export commonly used types and functions
pub use analyzer::{CheckScope, Policy, Violation, fix_content, validate_content};
pub use error::{ComposeValidatorError, Result};
pub use handlers::*;
use cli::{Cli, Commands};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the parsed command line. Returns whether every file is valid.
pub fn run_command(cli: Cli) -> Result<bool> {
    if let Some(Commands::Version) = cli.command {
        println!("compose-validator version {}", VERSION);
        return Ok(true);
    }

    let scope = cli.scope();
    handlers::handle_validate(ValidateOptions {
        patterns: cli.files,
        fix: cli.fix,
        dry_run: cli.dry_run,
        config: cli.config,
        scope,
        format: cli.format.into(),
        verbose: cli.verbose > 0,
        quiet: cli.quiet,
    })
}
