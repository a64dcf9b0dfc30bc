use std::fmt;
use std::io::{self, Write};

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use thiserror::Error;

use crate::cli::{Command, ListArgs, StartArgs};
use crate::dates::{DateRange, format_timestamp, parse_timestamp};
use crate::duration::format_duration;
use crate::models::{TimeEntry, Workspace};
use crate::settings::Settings;
use crate::toggl::{TogglClient, TogglError};

pub const DEFAULT_DESCRIPTION: &str = "Working";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(
        "Error: API token not configured. Set TOGGLER_API_TOKEN environment variable or add api_token to config file."
    )]
    MissingToken,
    #[error("Error: No workspaces found")]
    NoWorkspace,
    #[error("Error creating HTTP client: {0}")]
    Client(#[source] TogglError),
    #[error("Error getting workspaces: {0}")]
    Workspaces(#[source] TogglError),
    #[error("Error starting timer: {0}")]
    Start(#[source] TogglError),
    #[error("Error stopping timer: {0}")]
    Stop(#[source] TogglError),
    #[error("Error getting current timer: {0}")]
    Current(#[source] TogglError),
    #[error("Error getting time entries: {0}")]
    Entries(#[source] TogglError),
    #[error("Error parsing time {value:?}: {source}")]
    TimeParse {
        value: String,
        source: chrono::ParseError,
    },
    #[error(transparent)]
    Output(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Completed,
    Running,
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryStatus::Completed => write!(f, "Completed"),
            EntryStatus::Running => write!(f, "Running"),
        }
    }
}

/// Runs one command. Failures are printed to `out` as the whole output of
/// the command; only a failing write to `out` itself is returned.
pub fn run(command: &Command, settings: &Settings, out: &mut dyn Write) -> io::Result<()> {
    let result = match command {
        Command::Start(args) => start(args, settings, out),
        Command::Stop => stop(settings, out),
        Command::Current => current(settings, out),
        Command::List(args) => list(args, settings, out),
    };

    match result {
        Ok(()) => Ok(()),
        Err(CommandError::Output(err)) => Err(err),
        Err(err) => {
            log::debug!("command failed: {err:?}");
            writeln!(out, "{err}")
        }
    }
}

/// Flag beats positional argument; both missing falls back to `Working`.
pub fn resolve_description(args: &StartArgs) -> String {
    [args.description.as_deref(), args.positional.as_deref()]
        .into_iter()
        .flatten()
        .find(|description| !description.is_empty())
        .unwrap_or(DEFAULT_DESCRIPTION)
        .to_string()
}

/// Always the first workspace the service lists.
pub fn select_workspace(workspaces: Vec<Workspace>) -> Result<Workspace, CommandError> {
    workspaces.into_iter().next().ok_or(CommandError::NoWorkspace)
}

fn start(args: &StartArgs, settings: &Settings, out: &mut dyn Write) -> Result<(), CommandError> {
    let description = resolve_description(args);
    let client = connect(settings)?;
    let workspace = workspace(&client)?;

    let entry = client
        .start_timer(workspace.id, &description)
        .map_err(CommandError::Start)?;
    writeln!(out, "Timer started: \"{}\" (ID: {})", entry.description, entry.id)?;
    Ok(())
}

fn stop(settings: &Settings, out: &mut dyn Write) -> Result<(), CommandError> {
    let client = connect(settings)?;
    let workspace = workspace(&client)?;

    match client.stop_timer(workspace.id).map_err(CommandError::Stop)? {
        Some(entry) => writeln!(out, "Timer stopped: \"{}\" (ID: {})", entry.description, entry.id)?,
        None => writeln!(out, "No timer is currently running")?,
    }
    Ok(())
}

fn current(settings: &Settings, out: &mut dyn Write) -> Result<(), CommandError> {
    let client = connect(settings)?;
    let workspace = workspace(&client)?;

    let Some(entry) = client
        .get_current_timer(workspace.id)
        .map_err(CommandError::Current)?
    else {
        writeln!(out, "No timer is currently running")?;
        return Ok(());
    };
    render_current(&entry, Utc::now(), out)
}

fn list(args: &ListArgs, settings: &Settings, out: &mut dyn Write) -> Result<(), CommandError> {
    let client = connect(settings)?;
    let workspace = workspace(&client)?;

    let (start_date, end_date) = DateRange::last_days(args.days).as_query();
    let entries = client
        .get_time_entries(workspace.id, &start_date, &end_date)
        .map_err(CommandError::Entries)?;
    render_entries(&entries, args.days, Utc::now(), out)
}

fn connect(settings: &Settings) -> Result<TogglClient, CommandError> {
    let token = settings.token().ok_or(CommandError::MissingToken)?;
    TogglClient::new(token.to_string(), &settings.api_url).map_err(CommandError::Client)
}

fn workspace(client: &TogglClient) -> Result<Workspace, CommandError> {
    let workspaces = client.get_workspaces().map_err(CommandError::Workspaces)?;
    let workspace = select_workspace(workspaces)?;
    log::debug!("using workspace {} ({})", workspace.name, workspace.id);
    Ok(workspace)
}

fn parse(value: &str) -> Result<DateTime<FixedOffset>, CommandError> {
    parse_timestamp(value).map_err(|source| CommandError::TimeParse {
        value: value.to_string(),
        source,
    })
}

/// One `list` line, fully resolved before anything is printed.
#[derive(Debug, Clone)]
pub struct ListedEntry {
    pub description: String,
    pub elapsed: TimeDelta,
    pub status: EntryStatus,
    pub started: String,
    pub stopped: Option<String>,
}

impl ListedEntry {
    /// Stopped entries measure start to stop, running ones start to `now`.
    pub fn resolve(entry: &TimeEntry, now: DateTime<Utc>) -> Result<Self, CommandError> {
        let start = parse(&entry.start)?;
        let (elapsed, status, stopped) = if entry.is_running() {
            (now - start.with_timezone(&Utc), EntryStatus::Running, None)
        } else {
            let stop = parse(&entry.stop)?;
            (stop - start, EntryStatus::Completed, Some(format_timestamp(&stop)))
        };
        Ok(Self {
            description: entry.description.clone(),
            elapsed,
            status,
            started: format_timestamp(&start),
            stopped,
        })
    }
}

pub fn render_current(
    entry: &TimeEntry,
    now: DateTime<Utc>,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let start = parse(&entry.start)?;
    let elapsed = now - start.with_timezone(&Utc);

    writeln!(out, "Current timer:")?;
    writeln!(out, "• Description: {}", entry.description)?;
    writeln!(out, "• Started: {}", format_timestamp(&start))?;
    writeln!(out, "• Duration: {}", format_duration(elapsed))?;
    writeln!(out, "• ID: {}", entry.id)?;
    Ok(())
}

/// Nothing is written unless every entry's timestamps parse.
pub fn render_entries(
    entries: &[TimeEntry],
    days: u32,
    now: DateTime<Utc>,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    if entries.is_empty() {
        writeln!(out, "No time entries found for the last {days} day(s)")?;
        return Ok(());
    }

    let listed = entries
        .iter()
        .map(|entry| ListedEntry::resolve(entry, now))
        .collect::<Result<Vec<_>, _>>()?;
    let total_seconds: i64 = listed
        .iter()
        .map(|entry| entry.elapsed.num_seconds().max(0))
        .sum();

    writeln!(out, "Time entries for the last {days} day(s):")?;
    writeln!(out)?;
    for entry in &listed {
        writeln!(
            out,
            "• {} - {} ({})",
            format_duration(entry.elapsed),
            entry.description,
            entry.status
        )?;
        writeln!(out, "  Started: {}", entry.started)?;
        if let Some(stopped) = &entry.stopped {
            writeln!(out, "  Stopped: {stopped}")?;
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "Total time: {}",
        format_duration(TimeDelta::seconds(total_seconds))
    )?;
    Ok(())
}
