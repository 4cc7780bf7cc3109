//! trk plan command implementation
//!
//! Prints the prioritized view: every time-boxed item in start-time order.

use std::path::PathBuf;

use crate::error::Result;
use crate::model::TIME_FORMAT;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::persist;

use super::ItemReport;

/// Options for the plan command
pub struct PlanOptions {
    pub file: PathBuf,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: PlanOptions) -> Result<()> {
    let board = persist::load(&options.file)?;
    let items = board.prioritized();

    let mut human = HumanOutput::new(format!("{} scheduled item(s)", items.len()));
    for item in &items {
        let window = match (item.start, item.end_time()) {
            (Some(start), Some(end)) => format!(
                "{} .. {}",
                start.format(TIME_FORMAT),
                end.format(TIME_FORMAT)
            ),
            (Some(start), None) => format!("{} ..", start.format(TIME_FORMAT)),
            _ => String::new(),
        };
        human.push_detail(format!("#{} {} {}", item.id, item.title, window));
    }

    let reports: Vec<ItemReport> = items.iter().map(|item| ItemReport::new(item)).collect();
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "plan",
        &reports,
        Some(&human),
    )
}
