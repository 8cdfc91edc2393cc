use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::analyzer::{CheckScope, formatter};

#[derive(Parser, Debug)]
#[command(name = "compose-validator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate and fix Docker Compose YAML field ordering")]
#[command(long_about = "Docker Compose Field Order Validator

Validates Docker Compose service definitions against a canonical field order and
checks that environment variables, volumes and labels are alphabetized.")]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Compose files or glob patterns to check
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<String>,

    /// Automatically fix violations
    #[arg(long)]
    pub fix: bool,

    /// Show what --fix would change without writing files
    #[arg(long, requires = "fix")]
    pub dry_run: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only check field order
    #[arg(long, conflicts_with = "check_alphabetization_only")]
    pub check_order_only: bool,

    /// Only check alphabetization
    #[arg(long)]
    pub check_alphabetization_only: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "stylish")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output (-v lists valid files and the loaded policy, -vv for debug logs, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except problems
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Stylish,
    Json,
    Github,
}

impl From<OutputFormat> for formatter::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Stylish => Self::Stylish,
            OutputFormat::Json => Self::Json,
            OutputFormat::Github => Self::GitHub,
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }

    /// Which rule families to report
    pub fn scope(&self) -> CheckScope {
        if self.check_order_only {
            CheckScope::OrderOnly
        } else if self.check_alphabetization_only {
            CheckScope::AlphabetizationOnly
        } else {
            CheckScope::All
        }
    }
}
