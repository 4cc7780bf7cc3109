//! Command-line interface for trk
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule. Commands are thin
//! drivers: load the board from the data file, call one board operation,
//! save when the operation mutated anything.

use std::path::PathBuf;

use chrono::{Duration, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{WorkItem, TIME_FORMAT};

mod add;
mod history;
mod ls;
mod plan;
mod rm;
mod show;
mod update;

/// trk - time-boxed work item tracker
///
/// Tracks tasks, epics, and subtasks with optional time boxes, rejecting
/// schedule overlaps and keeping a short history of recently viewed items.
#[derive(Parser, Debug)]
#[command(name = "trk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the data file (defaults to .trk.toml setting or trk.csv)
    #[arg(long, global = true, env = "TRK_FILE")]
    pub file: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a work item
    #[command(subcommand)]
    Add(AddCommands),

    /// List work items
    Ls {
        /// Restrict to one kind: task, epic, or subtask
        #[arg(long)]
        kind: Option<String>,
    },

    /// Show one work item (records the access in the history)
    Show {
        /// Work item id
        id: u32,
    },

    /// Update fields of a work item
    Update {
        /// Work item id
        id: u32,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        desc: Option<String>,

        /// New status: new, in-progress, done
        #[arg(long)]
        status: Option<String>,

        /// New duration (e.g. "90m", "2h"; bare number = minutes)
        #[arg(long)]
        duration: Option<String>,

        /// New start time (e.g. "2026-08-23T10:00")
        #[arg(long)]
        start: Option<String>,

        /// Remove the time box entirely
        #[arg(long)]
        clear_time: bool,
    },

    /// Remove a work item (epics cascade to their subtasks)
    Rm {
        /// Work item id
        id: u32,
    },

    /// Remove every work item of one kind
    #[command(subcommand)]
    Clear(ClearCommands),

    /// Show the prioritized schedule (time-boxed items in time order)
    Plan,

    /// Show recently viewed items, most recent last
    History,
}

/// Add subcommands
#[derive(Subcommand, Debug)]
pub enum AddCommands {
    /// Add a flat task
    Task {
        /// Task title
        title: String,

        /// Description
        #[arg(long, default_value = "")]
        desc: String,

        /// Status: new, in-progress, done
        #[arg(long)]
        status: Option<String>,

        /// Duration (e.g. "90m", "2h"; bare number = minutes)
        #[arg(long)]
        duration: Option<String>,

        /// Start time (e.g. "2026-08-23T10:00")
        #[arg(long)]
        start: Option<String>,
    },

    /// Add an epic (status and time are derived from its subtasks)
    Epic {
        /// Epic title
        title: String,

        /// Description
        #[arg(long, default_value = "")]
        desc: String,
    },

    /// Add a subtask owned by an epic
    Subtask {
        /// Subtask title
        title: String,

        /// Owning epic id
        #[arg(long, required = true)]
        epic: u32,

        /// Description
        #[arg(long, default_value = "")]
        desc: String,

        /// Status: new, in-progress, done
        #[arg(long)]
        status: Option<String>,

        /// Duration (e.g. "90m", "2h"; bare number = minutes)
        #[arg(long)]
        duration: Option<String>,

        /// Start time (e.g. "2026-08-23T10:00")
        #[arg(long)]
        start: Option<String>,
    },
}

/// Clear subcommands
#[derive(Subcommand, Debug)]
pub enum ClearCommands {
    /// Remove all flat tasks
    Tasks,
    /// Remove all epics and their subtasks
    Epics,
    /// Remove all subtasks, leaving empty epics
    Subtasks,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let config = Config::load()?;
        let file = self.file.clone().unwrap_or_else(|| config.data_file.clone());
        let json = self.json;
        let quiet = self.quiet;

        match self.command {
            Commands::Add(cmd) => match cmd {
                AddCommands::Task {
                    title,
                    desc,
                    status,
                    duration,
                    start,
                } => add::run_task(add::AddItemOptions {
                    title,
                    desc,
                    status,
                    duration,
                    start,
                    default_status: config.default_status,
                    file,
                    json,
                    quiet,
                }),
                AddCommands::Epic { title, desc } => add::run_epic(add::AddEpicOptions {
                    title,
                    desc,
                    file,
                    json,
                    quiet,
                }),
                AddCommands::Subtask {
                    title,
                    epic,
                    desc,
                    status,
                    duration,
                    start,
                } => add::run_subtask(
                    add::AddItemOptions {
                        title,
                        desc,
                        status,
                        duration,
                        start,
                        default_status: config.default_status,
                        file,
                        json,
                        quiet,
                    },
                    epic,
                ),
            },
            Commands::Ls { kind } => ls::run(ls::ListOptions {
                kind,
                file,
                json,
                quiet,
            }),
            Commands::Show { id } => show::run(show::ShowOptions {
                id,
                file,
                json,
                quiet,
            }),
            Commands::Update {
                id,
                title,
                desc,
                status,
                duration,
                start,
                clear_time,
            } => update::run(update::UpdateOptions {
                id,
                title,
                desc,
                status,
                duration,
                start,
                clear_time,
                file,
                json,
                quiet,
            }),
            Commands::Rm { id } => rm::run(rm::RmOptions {
                id,
                file,
                json,
                quiet,
            }),
            Commands::Clear(cmd) => rm::run_clear(rm::ClearOptions {
                target: cmd,
                file,
                json,
                quiet,
            }),
            Commands::Plan => plan::run(plan::PlanOptions { file, json, quiet }),
            Commands::History => history::run(history::HistoryOptions { file, json, quiet }),
        }
    }
}

/// Parse a duration string like "2h", "30m", "90"
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    if s.is_empty() {
        return Err(Error::InvalidArgument("Duration cannot be empty".to_string()));
    }

    // Find where the number ends and unit begins
    let (num_str, unit) = if let Some(pos) = s.find(|c: char| !c.is_ascii_digit()) {
        (&s[..pos], &s[pos..])
    } else {
        // Assume minutes if no unit
        (s, "m")
    };

    let num: i64 = num_str
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("Invalid duration number: {}", num_str)))?;

    let duration = match unit.to_lowercase().as_str() {
        "m" | "min" | "minute" | "minutes" => Duration::try_minutes(num),
        "h" | "hr" | "hour" | "hours" => Duration::try_hours(num),
        "d" | "day" | "days" => Duration::try_days(num),
        "w" | "week" | "weeks" => Duration::try_weeks(num),
        _ => {
            return Err(Error::InvalidArgument(format!(
                "Invalid duration unit '{}'. Expected: m, h, d, w",
                unit
            )));
        }
    };

    duration.ok_or_else(|| Error::InvalidArgument(format!("Duration '{}' is out of range", s)))
}

/// Parse a start timestamp, with or without seconds.
pub fn parse_start(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|_| {
            Error::InvalidArgument(format!(
                "Invalid start time '{}'. Expected e.g. 2026-08-23T10:00",
                s
            ))
        })
}

/// JSON view of a work item including the derived end time.
#[derive(Serialize)]
pub(crate) struct ItemReport<'a> {
    #[serde(flatten)]
    item: &'a WorkItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<NaiveDateTime>,
}

impl<'a> ItemReport<'a> {
    pub fn new(item: &'a WorkItem) -> Self {
        Self {
            item,
            end: item.end_time(),
        }
    }
}

/// One-line human rendering used by listings.
pub(crate) fn summary_line(item: &WorkItem) -> String {
    let mut line = format!("#{} [{}] {} ({})", item.id, item.kind_name(), item.title, item.status);
    if let Some(start) = item.start {
        line.push_str(&format!(" @ {}", start.format(TIME_FORMAT)));
    }
    if let Some(duration) = item.duration {
        line.push_str(&format!(" +{}m", duration.num_minutes()));
    }
    if let Some(epic_id) = item.epic_id() {
        line.push_str(&format!(" (epic #{epic_id})"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_grammar_accepts_units_and_bare_minutes() {
        assert_eq!(parse_duration("90").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration("45m").unwrap(), Duration::minutes(45));
        assert_eq!(parse_duration("2h").unwrap(), Duration::hours(2));
        assert_eq!(parse_duration("1d").unwrap(), Duration::days(1));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("2y").is_err());
        assert!(parse_duration("-5m").is_err());
    }

    #[test]
    fn duration_grammar_rejects_out_of_range_values_without_panicking() {
        assert!(parse_duration("5000000000000000m").is_err());
        assert!(parse_duration("99999999999999999h").is_err());
        assert!(parse_duration(&i64::MAX.to_string()).is_err());
    }

    #[test]
    fn start_grammar_accepts_optional_seconds() {
        assert!(parse_start("2026-08-23T10:00").is_ok());
        assert!(parse_start("2026-08-23T10:00:30").is_ok());
        assert!(parse_start("23.08.2026").is_err());
    }
}
