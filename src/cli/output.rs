//! Output formatting utilities

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

/// Output format for report-style commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text and tables
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}
