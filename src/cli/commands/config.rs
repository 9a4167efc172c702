//! `mctab config` command - inspect the effective configuration

use clap::Subcommand;
use miette::{IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::core::config::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as YAML
    Show,

    /// Print which config file is in effect
    Path,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    let (config, source) = Config::load(global.config.as_deref()).into_diagnostic()?;

    match cmd {
        ConfigCommands::Show => {
            print!("{}", config.to_yaml().into_diagnostic()?);
        }
        ConfigCommands::Path => match source {
            Some(path) => println!("{}", path.display()),
            None => println!("(built-in defaults)"),
        },
    }
    Ok(())
}
