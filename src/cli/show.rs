//! trk show command implementation
//!
//! Shows one item and records the access in the recency history, which is
//! why a successful show rewrites the data file's history sidecar.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::model::TIME_FORMAT;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::persist;

use super::{summary_line, ItemReport};

/// Options for the show command
pub struct ShowOptions {
    pub id: u32,
    pub file: PathBuf,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: ShowOptions) -> Result<()> {
    let mut board = persist::load(&options.file)?;

    if board.get(options.id).is_none() {
        return Err(Error::NotFound(options.id));
    }
    persist::save(&board, &options.file)?;

    let item = board
        .item(options.id)
        .ok_or(Error::NotFound(options.id))?;

    let mut human = HumanOutput::new(summary_line(item));
    if !item.description.is_empty() {
        human.push_summary("description", item.description.clone());
    }
    if let Some(end) = item.end_time() {
        human.push_summary("ends", end.format(TIME_FORMAT).to_string());
    }
    if let Some(epic_id) = item.epic_id() {
        human.push_summary("epic", format!("#{epic_id}"));
    }
    for subtask in board.subtasks_of_epic(options.id) {
        human.push_detail(summary_line(subtask));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "show",
        &ItemReport::new(item),
        Some(&human),
    )
}
