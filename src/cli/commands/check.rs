//! `mctab check` command - report missing and unusable results without rendering

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{display_name, print_heading, print_load_report, print_missing};
use crate::cli::output::{print_json, OutputFormat};
use crate::core::config::Config;
use crate::core::grid::{check_completeness, Completeness, ExpectedGrid, MissingEntry};
use crate::core::loader::{load_results, DuplicatePolicy, LoadReport};
use crate::core::scenario::ScenarioKey;
use crate::core::variant::TableId;

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Table to check
    #[arg(value_enum)]
    pub table: TableId,

    /// Directory with the per-scenario CSV files
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// State of one expected scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Status {
    /// Row loaded with data
    Available,
    /// File loaded but carries no AB bias
    NoData,
    /// File present but skipped
    Unusable,
    Missing,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Available => write!(f, "available"),
            Status::NoData => write!(f, "no data"),
            Status::Unusable => write!(f, "unusable"),
            Status::Missing => write!(f, "missing"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ScenarioStatus {
    scenario: ScenarioKey,
    file: String,
    status: Status,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Scenario")]
    scenario: String,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Debug, Serialize)]
struct SkippedJson {
    file: String,
    reason: String,
}

#[derive(Debug, Serialize)]
struct DuplicateJson {
    scenario: ScenarioKey,
    replaced: String,
    kept: String,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    table: TableId,
    input_dir: PathBuf,
    expected: usize,
    available: usize,
    files_found: usize,
    missing: Vec<MissingEntry>,
    skipped: Vec<SkippedJson>,
    duplicates: Vec<DuplicateJson>,
    scenarios: Vec<ScenarioStatus>,
}

pub fn run(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let (config, _) = Config::load(global.config.as_deref()).into_diagnostic()?;
    let spec = args.table.spec();
    let input = args
        .input
        .clone()
        .unwrap_or_else(|| config.table(args.table).input_dir.clone());

    let completeness = check_completeness(&spec.grid, &input);
    // Collisions are reported, never fatal, when only checking
    let report =
        load_results(&input, &spec.grid, DuplicatePolicy::LastWins).into_diagnostic()?;
    let scenarios = scenario_statuses(&spec.grid, &completeness, &report);

    match args.format {
        OutputFormat::Json => {
            let json = CheckReport {
                table: args.table,
                input_dir: input.clone(),
                expected: completeness.expected,
                available: report.available(&spec.grid),
                files_found: report.files_found,
                missing: completeness.missing.clone(),
                skipped: report
                    .skipped
                    .iter()
                    .map(|s| SkippedJson {
                        file: display_name(&s.path),
                        reason: s.reason.to_string(),
                    })
                    .collect(),
                duplicates: report
                    .duplicates
                    .iter()
                    .map(|d| DuplicateJson {
                        scenario: d.key,
                        replaced: display_name(&d.replaced),
                        kept: display_name(&d.kept),
                    })
                    .collect(),
                scenarios,
            };
            print_json(&json)?;
        }
        OutputFormat::Text => {
            print_missing(&completeness);
            print_load_report(&report, true);

            let rows: Vec<StatusRow> = scenarios
                .iter()
                .map(|s| StatusRow {
                    scenario: s.scenario.to_string(),
                    file: s.file.clone(),
                    status: s.status.to_string(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));

            print_heading(&format!("{} check", args.table));
            println!("  Input:      {}", style(input.display()).cyan());
            println!("  Files:      {}", style(report.files_found).cyan());
            println!(
                "  Available:  {}/{}",
                style(report.available(&spec.grid)).green(),
                completeness.expected
            );
            println!(
                "  Missing:    {}",
                style(completeness.missing.len()).yellow()
            );
            println!();
        }
    }

    if completeness.is_complete() {
        Ok(())
    } else {
        Err(miette::miette!(
            "{} of {} expected result files missing for {}",
            completeness.missing.len(),
            completeness.expected,
            args.table
        ))
    }
}

fn scenario_statuses(
    grid: &ExpectedGrid,
    completeness: &Completeness,
    report: &LoadReport,
) -> Vec<ScenarioStatus> {
    grid.keys()
        .map(|key| {
            let loaded_from = report
                .loaded
                .iter()
                .rev()
                .find(|(_, k)| *k == key)
                .map(|(path, _)| display_name(path));

            let status = match report.results.get(&key) {
                Some(row) if row.is_available() => Status::Available,
                Some(_) => Status::NoData,
                None if completeness.is_missing(&key) => Status::Missing,
                None => Status::Unusable,
            };

            let file = loaded_from.unwrap_or_else(|| {
                key.candidate_filenames()
                    .into_iter()
                    .next()
                    .unwrap_or_default()
            });

            ScenarioStatus {
                scenario: key,
                file,
                status,
            }
        })
        .collect()
}
