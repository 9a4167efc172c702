//! `mctab render` command - write LaTeX tables from simulation results

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::args::{FormatFlags, GlobalOpts, TableSelection};
use crate::cli::helpers::{
    print_heading, print_load_report, print_missing, progress, sha256_hex, success,
};
use crate::core::config::Config;
use crate::core::grid::check_completeness;
use crate::core::loader::{load_results, DuplicatePolicy};
use crate::core::variant::TableId;
use crate::latex::table::{package_imports, write_table, TableRenderer, TableWrap};

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Table to render
    #[arg(value_enum)]
    pub table: TableSelection,

    /// Directory with the per-scenario CSV files (single table only)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Output .tex file (single table only)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub format: FormatFlags,

    /// Fail when two files map to the same scenario
    #[arg(long)]
    pub strict_duplicates: bool,

    /// Wrap the tabular in a table float with caption and label
    #[arg(long)]
    pub wrap: bool,

    /// Print the LaTeX to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

pub fn run(args: RenderArgs, global: &GlobalOpts) -> Result<()> {
    let tables = args.table.tables();
    if tables.len() > 1 && (args.input.is_some() || args.output.is_some()) {
        return Err(miette::miette!(
            "--input and --output apply to a single table, not `all`"
        ));
    }

    let (config, _) = Config::load(global.config.as_deref()).into_diagnostic()?;
    let renderer = TableRenderer::new(args.format.apply(config.format)).into_diagnostic()?;
    let policy = if args.strict_duplicates {
        DuplicatePolicy::Error
    } else {
        config.duplicates
    };

    for id in tables {
        render_table(id, &args, &config, &renderer, policy, global.quiet)?;
    }
    Ok(())
}

fn render_table(
    id: TableId,
    args: &RenderArgs,
    config: &Config,
    renderer: &TableRenderer,
    policy: DuplicatePolicy,
    quiet: bool,
) -> Result<()> {
    let spec = id.spec();
    let table_config = config.table(id);
    let input = args
        .input
        .clone()
        .unwrap_or_else(|| table_config.input_dir.clone());
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| table_config.output.clone());

    // stdout carries only the LaTeX in this mode
    let quiet = quiet || args.stdout;

    progress(
        quiet,
        format!("Rendering {} from {}", style(id).cyan(), input.display()),
    );

    let completeness = check_completeness(&spec.grid, &input);
    print_missing(&completeness);

    let report = load_results(&input, &spec.grid, policy).into_diagnostic()?;
    print_load_report(&report, quiet);

    let wrap = table_config.wrap.clone().or_else(|| {
        args.wrap.then(|| TableWrap {
            caption: spec.title.clone(),
            label: format!("tab:{}", id),
        })
    });
    let content = renderer
        .render(&spec, &report.results, wrap.as_ref())
        .into_diagnostic()?;

    if args.stdout {
        print!("{}", content);
        return Ok(());
    }

    write_table(&output, &content).into_diagnostic()?;

    print_heading(&format!("{} summary", id));
    println!("  Files found:      {}", style(report.files_found).cyan());
    println!("  Files skipped:    {}", style(report.skipped.len()).yellow());
    if !report.duplicates.is_empty() {
        println!(
            "  Duplicates:       {}",
            style(report.duplicates.len()).yellow()
        );
    }
    println!(
        "  Missing:          {}",
        style(completeness.missing.len()).yellow()
    );
    println!(
        "  Available:        {}/{}",
        style(report.available(&spec.grid)).green(),
        spec.grid.len()
    );
    println!("  Output:           {}", style(output.display()).cyan());
    println!(
        "  SHA-256:          {}",
        style(sha256_hex(content.as_bytes())).dim()
    );
    println!();
    println!("  Include with: \\input{{{}}}", output.display());
    println!("  Requires:     {}", package_imports().join(" "));
    println!();

    success(format!("Wrote {}", output.display()));
    Ok(())
}
