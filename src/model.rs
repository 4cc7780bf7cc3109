//! Work item model for trk.
//!
//! A `WorkItem` is one of three kinds: a flat `Task`, an `Epic` owning an
//! ordered list of subtask ids, or a `Subtask` back-referencing its epic.
//! Kind-specific data lives in the `ItemKind` variant; callers dispatch via
//! pattern matching or the capability accessors (`epic_id`, `subtask_ids`)
//! instead of downcasting.

use chrono::{Duration, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Timestamp format used across the CLI and the persistence layer.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Work item status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    New,
    InProgress,
    Done,
}

impl Status {
    /// Uppercase form used in the persisted row format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "NEW",
            Status::InProgress => "IN_PROGRESS",
            Status::Done => "DONE",
        }
    }
}

impl std::str::FromStr for Status {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Status::New),
            "in-progress" | "in_progress" | "doing" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            _ => Err(crate::error::Error::InvalidArgument(format!(
                "invalid status '{}': must be new, in-progress, or done",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain kind discriminant, for filters and lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Task,
    Epic,
    Subtask,
}

impl std::str::FromStr for Kind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "task" => Ok(Kind::Task),
            "epic" => Ok(Kind::Epic),
            "subtask" => Ok(Kind::Subtask),
            _ => Err(crate::error::Error::InvalidArgument(format!(
                "invalid kind '{}': must be task, epic, or subtask",
                s
            ))),
        }
    }
}

/// Kind-specific payload of a work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    Task,
    Epic {
        /// Child subtask ids in insertion order.
        subtasks: Vec<u32>,
        /// Rolled-up end of the coverage window (max child end). An epic's
        /// duration is the additive sum of child durations, so its end
        /// cannot be derived from `start + duration`.
        #[serde(skip_serializing_if = "Option::is_none")]
        end: Option<NaiveDateTime>,
    },
    Subtask {
        /// Owning epic. The epic owns the relationship; this is a
        /// back-reference only.
        epic_id: u32,
    },
}

/// A single work item: task, epic, or subtask
#[derive(Debug, Clone, Serialize)]
pub struct WorkItem {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub status: Status,
    /// Planned span in minutes granularity; absent means not time-boxed.
    #[serde(
        serialize_with = "serialize_minutes",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<Duration>,
    /// Scheduled start; absent means the item has no position on the
    /// timeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub kind: ItemKind,
}

fn serialize_minutes<S: Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match duration {
        Some(d) => serializer.serialize_i64(d.num_minutes()),
        None => serializer.serialize_none(),
    }
}

impl WorkItem {
    pub fn new_task(id: u32, title: impl Into<String>, description: impl Into<String>, status: Status) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            status,
            duration: None,
            start: None,
            kind: ItemKind::Task,
        }
    }

    /// A fresh epic starts `New` with no children; its status and time
    /// fields are derived from children from then on.
    pub fn new_epic(id: u32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            status: Status::New,
            duration: None,
            start: None,
            kind: ItemKind::Epic {
                subtasks: Vec::new(),
                end: None,
            },
        }
    }

    pub fn new_subtask(
        id: u32,
        title: impl Into<String>,
        description: impl Into<String>,
        status: Status,
        epic_id: u32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            status,
            duration: None,
            start: None,
            kind: ItemKind::Subtask { epic_id },
        }
    }

    /// End of the time box. For tasks and subtasks this is the derived
    /// `start + duration` when both are present; for epics it is the
    /// rolled-up coverage end.
    pub fn end_time(&self) -> Option<NaiveDateTime> {
        if let ItemKind::Epic { end, .. } = self.kind {
            return end;
        }
        match (self.start, self.duration) {
            (Some(start), Some(duration)) => Some(start + duration),
            _ => None,
        }
    }

    /// An item occupies the timeline once it has a start.
    pub fn is_time_boxed(&self) -> bool {
        self.start.is_some()
    }

    /// Uppercase kind tag used in the persisted row format.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ItemKind::Task => "TASK",
            ItemKind::Epic { .. } => "EPIC",
            ItemKind::Subtask { .. } => "SUBTASK",
        }
    }

    /// Plain discriminant for filtering.
    pub fn kind_of(&self) -> Kind {
        match self.kind {
            ItemKind::Task => Kind::Task,
            ItemKind::Epic { .. } => Kind::Epic,
            ItemKind::Subtask { .. } => Kind::Subtask,
        }
    }

    /// Owning epic id, for subtasks only.
    pub fn epic_id(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Subtask { epic_id } => Some(epic_id),
            _ => None,
        }
    }

    /// Child subtask ids, for epics only.
    pub fn subtask_ids(&self) -> Option<&[u32]> {
        match &self.kind {
            ItemKind::Epic { subtasks, .. } => Some(subtasks),
            _ => None,
        }
    }

    pub(crate) fn subtask_ids_mut(&mut self) -> Option<&mut Vec<u32>> {
        match &mut self.kind {
            ItemKind::Epic { subtasks, .. } => Some(subtasks),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn end_time_requires_both_endpoints() {
        let mut task = WorkItem::new_task(1, "t", "", Status::New);
        assert_eq!(task.end_time(), None);

        task.start = Some(at(10));
        assert_eq!(task.end_time(), None);

        task.duration = Some(Duration::minutes(90));
        assert_eq!(task.end_time(), Some(at(10) + Duration::minutes(90)));
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("NEW".parse::<Status>().unwrap(), Status::New);
        assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("IN_PROGRESS".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("Done".parse::<Status>().unwrap(), Status::Done);
        assert!("blocked".parse::<Status>().is_err());
    }

    #[test]
    fn capability_accessors_follow_kind() {
        let task = WorkItem::new_task(1, "t", "", Status::New);
        assert_eq!(task.epic_id(), None);
        assert_eq!(task.subtask_ids(), None);
        assert_eq!(task.kind_name(), "TASK");

        let epic = WorkItem::new_epic(2, "e", "");
        assert_eq!(epic.subtask_ids(), Some(&[][..]));
        assert_eq!(epic.status, Status::New);

        let sub = WorkItem::new_subtask(3, "s", "", Status::Done, 2);
        assert_eq!(sub.epic_id(), Some(2));
        assert_eq!(sub.kind_name(), "SUBTASK");
    }
}
