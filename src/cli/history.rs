//! trk history command implementation
//!
//! Prints the recently viewed items, oldest first, newest last. Listing
//! the history is not itself an access, so nothing is rewritten.

use std::path::PathBuf;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::persist;

use super::{summary_line, ItemReport};

/// Options for the history command
pub struct HistoryOptions {
    pub file: PathBuf,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: HistoryOptions) -> Result<()> {
    let board = persist::load(&options.file)?;
    let items = board.history();

    let mut human = HumanOutput::new(format!("{} recently viewed item(s)", items.len()));
    for item in &items {
        human.push_detail(summary_line(item));
    }

    let reports: Vec<ItemReport> = items.iter().map(|item| ItemReport::new(item)).collect();
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "history",
        &reports,
        Some(&human),
    )
}
