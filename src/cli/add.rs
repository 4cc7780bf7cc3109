//! trk add command implementation
//!
//! Creates tasks, epics, and subtasks. Time-boxed items are admitted only
//! when their interval is clear of every other scheduled item.

use std::path::PathBuf;

use crate::error::Result;
use crate::model::Status;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::persist;

use super::{parse_duration, parse_start, summary_line, ItemReport};

/// Options for adding a task or subtask
pub struct AddItemOptions {
    pub title: String,
    pub desc: String,
    pub status: Option<String>,
    pub duration: Option<String>,
    pub start: Option<String>,
    pub default_status: String,
    pub file: PathBuf,
    pub json: bool,
    pub quiet: bool,
}

/// Options for adding an epic
pub struct AddEpicOptions {
    pub title: String,
    pub desc: String,
    pub file: PathBuf,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_task(options: AddItemOptions) -> Result<()> {
    let (status, duration, start) = parse_fields(&options)?;
    let mut board = persist::load(&options.file)?;

    let id = board.create_task(
        options.title.as_str(),
        options.desc.as_str(),
        status,
        duration,
        start,
    )?;
    persist::save(&board, &options.file)?;

    emit_created(&options, &board, id, "add task")
}

pub fn run_subtask(options: AddItemOptions, epic_id: u32) -> Result<()> {
    let (status, duration, start) = parse_fields(&options)?;
    let mut board = persist::load(&options.file)?;

    let id = board.create_subtask(
        options.title.as_str(),
        options.desc.as_str(),
        status,
        epic_id,
        duration,
        start,
    )?;
    persist::save(&board, &options.file)?;

    emit_created(&options, &board, id, "add subtask")
}

pub fn run_epic(options: AddEpicOptions) -> Result<()> {
    let mut board = persist::load(&options.file)?;
    let id = board.create_epic(options.title.as_str(), options.desc.as_str());
    persist::save(&board, &options.file)?;

    let item = board.item(id).ok_or(crate::error::Error::NotFound(id))?;
    let mut human = HumanOutput::new(format!("Added epic #{id}"));
    human.push_summary("item", summary_line(item));
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add epic",
        &ItemReport::new(item),
        Some(&human),
    )
}

fn parse_fields(
    options: &AddItemOptions,
) -> Result<(Status, Option<chrono::Duration>, Option<chrono::NaiveDateTime>)> {
    let status: Status = options
        .status
        .as_deref()
        .unwrap_or(&options.default_status)
        .parse()?;
    let duration = options.duration.as_deref().map(parse_duration).transpose()?;
    let start = options.start.as_deref().map(parse_start).transpose()?;
    Ok((status, duration, start))
}

fn emit_created(
    options: &AddItemOptions,
    board: &crate::board::Board,
    id: u32,
    command: &str,
) -> Result<()> {
    let item = board.item(id).ok_or(crate::error::Error::NotFound(id))?;
    let mut human = HumanOutput::new(format!("Added #{id}"));
    human.push_summary("item", summary_line(item));
    if item.is_time_boxed() {
        human.push_summary("scheduled", "yes".to_string());
    }
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        command,
        &ItemReport::new(item),
        Some(&human),
    )
}
