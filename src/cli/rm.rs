//! trk rm and clear command implementations
//!
//! Deletion is idempotent: removing an unknown id succeeds with a warning
//! so retries are safe.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::persist;

use super::ClearCommands;

/// Options for the rm command
pub struct RmOptions {
    pub id: u32,
    pub file: PathBuf,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the clear command
pub struct ClearOptions {
    pub target: ClearCommands,
    pub file: PathBuf,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct RemovalReport {
    id: u32,
    removed: bool,
}

#[derive(Serialize)]
struct ClearReport {
    target: &'static str,
    remaining: usize,
}

pub fn run(options: RmOptions) -> Result<()> {
    let mut board = persist::load(&options.file)?;
    let removed = board.remove_by_id(options.id);
    if removed {
        persist::save(&board, &options.file)?;
    }

    let mut human = if removed {
        HumanOutput::new(format!("Removed #{}", options.id))
    } else {
        HumanOutput::new(format!("Nothing to remove for #{}", options.id))
    };
    if !removed {
        human.push_warning(format!("no work item with id {}", options.id));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "rm",
        &RemovalReport {
            id: options.id,
            removed,
        },
        Some(&human),
    )
}

pub fn run_clear(options: ClearOptions) -> Result<()> {
    let mut board = persist::load(&options.file)?;

    let target = match options.target {
        ClearCommands::Tasks => {
            board.clear_tasks();
            "tasks"
        }
        ClearCommands::Epics => {
            board.clear_epics();
            "epics"
        }
        ClearCommands::Subtasks => {
            board.clear_subtasks();
            "subtasks"
        }
    };
    persist::save(&board, &options.file)?;

    let mut human = HumanOutput::new(format!("Cleared all {target}"));
    human.push_summary("remaining items", board.len().to_string());
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "clear",
        &ClearReport {
            target,
            remaining: board.len(),
        },
        Some(&human),
    )
}
