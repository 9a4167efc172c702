//! `mctab format` command - format raw values the way table cells are formatted

use miette::{IntoDiagnostic, Result};

use crate::cli::args::{FormatFlags, GlobalOpts};
use crate::core::config::Config;
use crate::latex::number::format_text;

#[derive(clap::Args, Debug)]
pub struct FormatArgs {
    /// Values to format; text that is not a number prints the placeholder
    #[arg(required = true, allow_negative_numbers = true)]
    pub values: Vec<String>,

    #[command(flatten)]
    pub format: FormatFlags,
}

pub fn run(args: FormatArgs, global: &GlobalOpts) -> Result<()> {
    let (config, _) = Config::load(global.config.as_deref()).into_diagnostic()?;
    let options = args.format.apply(config.format);

    for value in &args.values {
        println!("{}", format_text(value, &options));
    }
    Ok(())
}
