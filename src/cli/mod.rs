//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod helpers;
pub mod output;

pub use args::{Cli, Commands, FormatFlags, GlobalOpts, TableSelection};
pub use output::OutputFormat;
