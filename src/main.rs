use clap::Parser;
use miette::Result;
use mctab::cli::{Cli, Commands};

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = &cli.global;

    match cli.command {
        Commands::Render(args) => mctab::cli::commands::render::run(args, global),
        Commands::Check(args) => mctab::cli::commands::check::run(args, global),
        Commands::Format(args) => mctab::cli::commands::format::run(args, global),
        Commands::Config(cmd) => mctab::cli::commands::config::run(cmd, global),
        Commands::Completions(args) => mctab::cli::commands::completions::run(args),
    }
}
