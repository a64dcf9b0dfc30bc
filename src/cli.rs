use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "toggler", version, about = "A CLI for Toggl attendance")]
pub struct Cli {
    /// Read configuration from this YAML file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output on stderr (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Silence all log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start a new time entry
    Start(StartArgs),
    /// Stop the currently running time entry
    Stop,
    /// Show the currently running time entry
    Current,
    /// List recent time entries
    List(ListArgs),
}

#[derive(Debug, Clone, Args)]
pub struct StartArgs {
    /// Description for the time entry
    #[arg(value_name = "DESCRIPTION")]
    pub positional: Option<String>,

    /// Description for the time entry (takes precedence over the positional one)
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Number of days to look back (1 = today only)
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: u32,
}
