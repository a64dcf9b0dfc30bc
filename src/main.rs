use std::error::Error;
use std::io::{self, Write};

use clap::Parser;

mod cli;
mod commands;
mod dates;
mod duration;
mod models;
mod settings;
mod toggl;

use cli::Cli;
use settings::Settings;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    stderrlog::new()
        .module(module_path!())
        .quiet(cli.quiet)
        .verbosity(usize::from(cli.verbose) + 1)
        .init()?;

    let settings = Settings::load(cli.config.as_deref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(&cli.command, &settings, &mut out)?;
    out.flush()?;

    Ok(())
}
