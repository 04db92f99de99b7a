use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gantt-todo", version, about = "Terminal to-do list with a Gantt-style chart")]
pub struct Cli {
    /// Settings file (defaults to the platform config dir, if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Launch the interactive TUI
    Tui,
    /// Print the chart for the configured tasks
    Chart,
    /// List the configured tasks with their status
    List,
}
