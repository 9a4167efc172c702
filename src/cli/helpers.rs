//! Shared helper functions for CLI commands
//!
//! Console conventions: `→` progress on stdout, `✓` success, `!` warnings on
//! stderr, `✗` failures.

use console::style;
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::core::grid::Completeness;
use crate::core::loader::LoadReport;

/// Width of the summary rule
const RULE_WIDTH: usize = 60;

/// Print a progress line unless quiet
pub fn progress(quiet: bool, message: impl std::fmt::Display) {
    if !quiet {
        println!("{} {}", style("→").blue(), message);
    }
}

pub fn success(message: impl std::fmt::Display) {
    println!("{} {}", style("✓").green(), message);
}

pub fn warn(message: impl std::fmt::Display) {
    eprintln!("{} {}", style("!").yellow(), message);
}

/// Print a bold heading between two dim rules
pub fn print_heading(title: &str) {
    println!();
    println!("{}", style("─".repeat(RULE_WIDTH)).dim());
    println!("{}", style(title).bold());
    println!("{}", style("─".repeat(RULE_WIDTH)).dim());
}

/// Lowercase hex SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// File name of `path` for one-line messages
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Warn about every expected combination without a file
pub fn print_missing(completeness: &Completeness) {
    for entry in &completeness.missing {
        warn(format!(
            "Missing {} (expected {})",
            entry.key,
            style(entry.expected_filename()).cyan()
        ));
    }
}

/// Progress for loaded files, warnings for skipped files and collisions
pub fn print_load_report(report: &LoadReport, quiet: bool) {
    for (path, key) in &report.loaded {
        progress(quiet, format!("Loaded {} ({})", display_name(path), key));
    }
    for skipped in &report.skipped {
        warn(format!(
            "Skipped {}: {}",
            display_name(&skipped.path),
            skipped.reason
        ));
    }
    for dup in &report.duplicates {
        warn(format!(
            "Duplicate results for {}: {} replaced by {}",
            dup.key,
            display_name(&dup.replaced),
            display_name(&dup.kept)
        ));
    }
}
