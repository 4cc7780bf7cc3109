//! trk ls command implementation

use std::path::PathBuf;

use crate::error::Result;
use crate::model::Kind;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::persist;

use super::{summary_line, ItemReport};

/// Options for the ls command
pub struct ListOptions {
    pub kind: Option<String>,
    pub file: PathBuf,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: ListOptions) -> Result<()> {
    let kind = options
        .kind
        .as_deref()
        .map(str::parse::<Kind>)
        .transpose()?;
    let board = persist::load(&options.file)?;

    let items = match kind {
        Some(kind) => board.all_of_kind(kind),
        // Tasks, then epics, then subtasks, id order within each.
        None => {
            let mut all = board.all_tasks();
            all.extend(board.all_epics());
            all.extend(board.all_subtasks());
            all
        }
    };

    let mut human = HumanOutput::new(format!("{} work item(s)", items.len()));
    for item in &items {
        human.push_detail(summary_line(item));
    }

    let reports: Vec<ItemReport> = items.iter().map(|item| ItemReport::new(item)).collect();
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "ls",
        &reports,
        Some(&human),
    )
}
