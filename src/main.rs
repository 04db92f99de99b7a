mod cli;
mod commands;
mod config;
mod logging;
mod model;
mod render;
mod status;
mod store;
mod ui;
mod window;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.command.unwrap_or(cli::Command::Tui);
    let settings = config::resolve(args.config.as_deref(), args.today.as_deref())?;
    logging::init(
        settings.log_file.as_deref(),
        command == cli::Command::Tui,
    )?;
    match command {
        cli::Command::Tui => commands::tui(&settings),
        cli::Command::Chart => commands::chart(&settings),
        cli::Command::List => commands::list(&settings),
    }
}
