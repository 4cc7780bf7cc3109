//! Epic aggregation for trk.
//!
//! An epic never carries caller-assigned status or time fields; they are
//! recomputed from the live child set after every mutation that touches a
//! child. The computation is a pure function over child snapshots so the
//! board can apply it synchronously and tests can drive it directly.

use chrono::{Duration, NaiveDateTime};

use crate::model::{Status, WorkItem};

/// Derived epic fields, computed from the child set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rollup {
    pub status: Status,
    /// Additive sum of present child durations. Gaps between
    /// non-contiguous child intervals do not count as busy time.
    pub duration: Duration,
    /// Minimum present child start; absent when no child is scheduled.
    pub start: Option<NaiveDateTime>,
    /// Maximum present child end; the full coverage window may exceed
    /// `start + duration`.
    pub end: Option<NaiveDateTime>,
}

impl Rollup {
    /// The rollup of an epic with no children.
    pub fn empty() -> Self {
        Self {
            status: Status::New,
            duration: Duration::zero(),
            start: None,
            end: None,
        }
    }
}

/// Recompute an epic's derived fields from its children.
pub fn rollup(children: &[&WorkItem]) -> Rollup {
    if children.is_empty() {
        return Rollup::empty();
    }

    let all_new = children.iter().all(|child| child.status == Status::New);
    let all_done = children.iter().all(|child| child.status == Status::Done);
    let status = if all_new {
        Status::New
    } else if all_done {
        Status::Done
    } else {
        Status::InProgress
    };

    // Saturating sum: child durations are bounded on input, but the sum
    // over an arbitrary child set must never panic.
    let duration = children
        .iter()
        .filter_map(|child| child.duration)
        .fold(Duration::zero(), |acc, d| {
            acc.checked_add(&d).unwrap_or(Duration::MAX)
        });
    let start = children.iter().filter_map(|child| child.start).min();
    let end = children.iter().filter_map(|child| child.end_time()).max();

    Rollup {
        status,
        duration,
        start,
        end,
    }
}
