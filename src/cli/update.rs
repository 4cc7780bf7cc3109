//! trk update command implementation

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::model::{Kind, Status};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::persist;

use super::{parse_duration, parse_start, summary_line, ItemReport};

/// Options for the update command
pub struct UpdateOptions {
    pub id: u32,
    pub title: Option<String>,
    pub desc: Option<String>,
    pub status: Option<String>,
    pub duration: Option<String>,
    pub start: Option<String>,
    pub clear_time: bool,
    pub file: PathBuf,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: UpdateOptions) -> Result<()> {
    let mut board = persist::load(&options.file)?;
    let mut item = board
        .item(options.id)
        .cloned()
        .ok_or(Error::NotFound(options.id))?;

    let derived_fields_requested =
        options.status.is_some() || options.duration.is_some() || options.start.is_some();

    if let Some(title) = &options.title {
        item.title = title.clone();
    }
    if let Some(desc) = &options.desc {
        item.description = desc.clone();
    }
    if let Some(status) = &options.status {
        item.status = status.parse::<Status>()?;
    }
    if let Some(duration) = &options.duration {
        item.duration = Some(parse_duration(duration)?);
    }
    if let Some(start) = &options.start {
        item.start = Some(parse_start(start)?);
    }
    if options.clear_time {
        item.duration = None;
        item.start = None;
    }

    let is_epic = item.kind_of() == Kind::Epic;
    board.update(item)?;
    persist::save(&board, &options.file)?;

    let item = board
        .item(options.id)
        .ok_or(Error::NotFound(options.id))?;
    let mut human = HumanOutput::new(format!("Updated #{}", options.id));
    human.push_summary("item", summary_line(item));
    if is_epic && derived_fields_requested {
        human.push_warning("epic status and time are derived from subtasks; recomputed".to_string());
    }
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "update",
        &ItemReport::new(item),
        Some(&human),
    )
}
