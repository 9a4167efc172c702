//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    check::CheckArgs, completions::CompletionsArgs, config::ConfigCommands, format::FormatArgs,
    render::RenderArgs,
};
use crate::core::variant::TableId;
use crate::latex::number::{Alignment, FormatOptions};

#[derive(Parser, Debug)]
#[command(
    name = "mctab",
    version,
    about = "Render Monte Carlo simulation results into publication-ready LaTeX tables",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Config file (default: ./mctab.yaml if present)
    #[arg(long, global = true, env = "MCTAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress per-file progress lines
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load results and write a LaTeX table
    Render(RenderArgs),

    /// Report missing and unusable result files without rendering
    Check(CheckArgs),

    /// Format numbers the way table cells are formatted
    Format(FormatArgs),

    /// Inspect the effective configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

/// Which tables `render` should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableSelection {
    #[value(name = "table1")]
    Table1,
    #[value(name = "table2")]
    Table2,
    #[value(name = "table3")]
    Table3,
    /// Every table
    All,
}

impl TableSelection {
    pub fn tables(self) -> Vec<TableId> {
        match self {
            TableSelection::Table1 => vec![TableId::Table1],
            TableSelection::Table2 => vec![TableId::Table2],
            TableSelection::Table3 => vec![TableId::Table3],
            TableSelection::All => TableId::ALL.to_vec(),
        }
    }
}

/// Number formatting overrides
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FormatFlags {
    /// Sign layout (default from config: aligned)
    #[arg(long, value_enum)]
    pub alignment: Option<Alignment>,

    /// Do not underline the first significant decimal
    #[arg(long)]
    pub no_underline: bool,
}

impl FormatFlags {
    /// Apply these flags on top of configured options
    pub fn apply(&self, options: FormatOptions) -> FormatOptions {
        FormatOptions {
            underline_first_significant: options.underline_first_significant && !self.no_underline,
            alignment: self.alignment.unwrap_or(options.alignment),
        }
    }
}
