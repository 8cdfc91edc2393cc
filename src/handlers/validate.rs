//! Handler for validating (and optionally fixing) compose files.
//!
//! Inputs are resolved to a deduplicated file list, excluded files are
//! skipped, and the remaining files are processed in parallel. Reports are
//! printed in input order once every file is done.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use colored::Colorize;
use rayon::prelude::*;

use crate::analyzer::{
    CheckScope, FileReport, FixError, FormatOptions, OutputFormat, Policy, fix_content,
    format_results, validate_content,
};
use crate::config;
use crate::error::{ComposeValidatorError, Result};

/// Configuration for the validate command
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Files or glob patterns
    pub patterns: Vec<String>,
    /// Rewrite files that have violations
    pub fix: bool,
    /// Compute fixes without writing them
    pub dry_run: bool,
    /// Explicit config file
    pub config: Option<PathBuf>,
    pub scope: CheckScope,
    pub format: OutputFormat,
    pub verbose: bool,
    pub quiet: bool,
}

/// Resolved input files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedInputs {
    /// Files to process, first occurrence order.
    pub files: Vec<PathBuf>,
    /// Glob patterns that matched nothing.
    pub unmatched: Vec<String>,
}

/// Run validation and return whether every file ended up valid.
pub fn handle_validate(options: ValidateOptions) -> Result<bool> {
    let policy = config::load_policy(options.config.as_deref())?;
    let stylish = options.format == OutputFormat::Stylish;

    if options.verbose && stylish {
        print_policy(&policy);
    }

    let inputs = resolve_inputs(&options.patterns)?;
    if !options.quiet {
        for pattern in &inputs.unmatched {
            eprintln!(
                "{}",
                format!("Warning: no files match pattern {}", pattern).yellow()
            );
        }
    }

    let targets: Vec<PathBuf> = inputs
        .files
        .into_iter()
        .filter(|path| {
            let excluded = policy.is_excluded(path);
            if excluded {
                log::debug!("Skipping excluded file: {}", path.display());
                if options.verbose && stylish {
                    println!(
                        "{}",
                        format!("Skipping excluded file: {}", path.display()).yellow()
                    );
                }
            }
            !excluded
        })
        .collect();

    log::info!("Processing {} file(s)", targets.len());

    let reports: Vec<FileReport> = targets
        .par_iter()
        .map(|path| process_file(path, &policy, &options))
        .collect();

    let format_options = FormatOptions {
        verbose: options.verbose,
        fix_mode: options.fix,
        quiet: options.quiet,
    };
    let output = format_results(&reports, options.format, format_options);
    if !output.is_empty() {
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }

    Ok(reports.iter().all(FileReport::is_valid))
}

/// Expand patterns into files. Plain paths are kept even if missing so
/// that the read error is reported for them.
pub fn resolve_inputs(patterns: &[String]) -> Result<ResolvedInputs> {
    let mut seen = HashSet::new();
    let mut inputs = ResolvedInputs::default();

    for pattern in patterns {
        if !is_glob(pattern) {
            let path = PathBuf::from(pattern);
            if seen.insert(path.clone()) {
                inputs.files.push(path);
            }
            continue;
        }

        let entries = glob::glob(pattern).map_err(|e| ComposeValidatorError::Pattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        let mut matched = 0;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    matched += 1;
                    if seen.insert(path.clone()) {
                        inputs.files.push(path);
                    }
                }
                Ok(_) => {}
                Err(e) => log::warn!("Cannot read {}: {}", e.path().display(), e.error()),
            }
        }

        if matched == 0 {
            inputs.unmatched.push(pattern.clone());
        }
    }

    Ok(inputs)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Check one file and, in fix mode, repair it.
pub fn process_file(path: &Path, policy: &Policy, options: &ValidateOptions) -> FileReport {
    let start = Instant::now();
    let report = match try_process_file(path, policy, options) {
        Ok(report) => report,
        Err(e) => {
            log::debug!("{}", e);
            FileReport::failed(path.display().to_string(), e.to_string())
        }
    };
    log::debug!("Processed {} in {:?}", path.display(), start.elapsed());
    report
}

fn try_process_file(path: &Path, policy: &Policy, options: &ValidateOptions) -> Result<FileReport> {
    let path_str = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| ComposeValidatorError::Io {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |source| ComposeValidatorError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let result = validate_content(&content, &path_str, policy, options.scope).map_err(parse_error)?;
    log::debug!("{}: {} violation(s)", path_str, result.violations.len());

    if result.is_valid() || !options.fix {
        return Ok(FileReport::checked(result));
    }

    let fix_error = |source| ComposeValidatorError::Fix {
        path: path.to_path_buf(),
        source,
    };

    let fixed = fix_content(&content, policy).map_err(fix_error)?;
    if !fixed.fixed {
        return Ok(FileReport::checked(result));
    }

    // The output must parse before it may replace the original.
    let revalidated = validate_content(&fixed.content, &path_str, policy, options.scope)
        .map_err(|e| fix_error(FixError::Parse(e)))?;

    if options.dry_run {
        return Ok(FileReport::checked(result).with_changes(fixed.changes, false));
    }

    fs::write(path, &fixed.content).map_err(|source| ComposeValidatorError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Fixed {} ({} change(s))", path_str, fixed.changes.len());

    Ok(FileReport::checked(revalidated).with_changes(fixed.changes, true))
}

fn print_policy(policy: &Policy) {
    let rules = policy.alphabetization();
    println!("{}", "Loaded configuration".blue());
    println!("Field order: [{}]", policy.canonical_order().join(" "));
    println!(
        "Alphabetization: env={}, volumes={}, labels={}",
        rules.environment, rules.volumes, rules.labels
    );
    println!("Strict: {}", policy.is_strict());
}
