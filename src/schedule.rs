//! Schedule index for trk.
//!
//! Maintains the prioritized view: a strict total order over time-boxed
//! work items (start ascending, unscheduled last, ties broken by id) and
//! answers conflict queries against it. Intervals are closed on both ends,
//! so two time boxes that merely touch at an endpoint conflict.
//!
//! The index is the conflict-check search space; admission control lives in
//! the board, which never mutates the index on a rejected admission.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;

use crate::model::WorkItem;

/// Ordering key for the prioritized view.
///
/// Items with no start sort after every scheduled item; within a bucket the
/// id breaks ties, so the order is strict and never merges distinct items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleKey {
    pub start: Option<NaiveDateTime>,
    pub id: u32,
}

impl Ord for ScheduleKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.start, other.start) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.id.cmp(&other.id)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.id.cmp(&other.id),
        }
    }
}

impl PartialOrd for ScheduleKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Total order plus conflict detection over time-boxed items.
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    /// Ordered entries; the value is the derived end, absent when the item
    /// has a start but no duration.
    entries: BTreeMap<ScheduleKey, Option<NaiveDateTime>>,
    /// Reverse lookup so removal by id needs no caller-supplied key.
    keys: HashMap<u32, ScheduleKey>,
}

impl ScheduleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index an item. No-op unless the item has a start; the caller must
    /// have run the conflict check already, insertion does not re-check.
    pub fn insert(&mut self, item: &WorkItem) {
        let Some(start) = item.start else {
            return;
        };
        let key = ScheduleKey {
            start: Some(start),
            id: item.id,
        };
        self.remove(item.id);
        self.entries.insert(key, item.end_time());
        self.keys.insert(item.id, key);
    }

    /// Drop an item from the index; no-op if absent.
    pub fn remove(&mut self, id: u32) {
        if let Some(key) = self.keys.remove(&id) {
            self.entries.remove(&key);
        }
    }

    /// Id of the first indexed item whose closed interval intersects
    /// `[start, end]`, skipping `exclude`. `None` means the candidate is
    /// admissible.
    pub fn conflict_with(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<u32>,
    ) -> Option<u32> {
        self.entries
            .iter()
            .filter(|(key, _)| Some(key.id) != exclude)
            .find(|(key, entry_end)| {
                let (Some(other_start), Some(other_end)) = (key.start, **entry_end) else {
                    return false;
                };
                !(start > other_end || end < other_start)
            })
            .map(|(key, _)| key.id)
    }

    /// Conflict check for a candidate item, excluding the item itself.
    /// Items missing either endpoint cannot conflict.
    pub fn conflict_for(&self, item: &WorkItem) -> Option<u32> {
        let (start, end) = (item.start?, item.end_time()?);
        self.conflict_with(start, end, Some(item.id))
    }

    /// The prioritized view: all indexed ids in schedule order.
    pub fn ordered_ids(&self) -> Vec<u32> {
        self.entries.keys().map(|key| key.id).collect()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.keys.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use chrono::{Duration, NaiveDate};

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn boxed(id: u32, start_hour: u32, minutes: i64) -> WorkItem {
        let mut item = WorkItem::new_task(id, format!("t{id}"), "", Status::New);
        item.start = Some(at(start_hour, 0));
        item.duration = Some(Duration::minutes(minutes));
        item
    }

    #[test]
    fn key_order_puts_unscheduled_last_and_breaks_ties_by_id() {
        let scheduled_late = ScheduleKey {
            start: Some(at(12, 0)),
            id: 1,
        };
        let scheduled_early = ScheduleKey {
            start: Some(at(9, 0)),
            id: 9,
        };
        let same_start_lower_id = ScheduleKey {
            start: Some(at(12, 0)),
            id: 0,
        };
        let unscheduled = ScheduleKey { start: None, id: 0 };

        assert!(scheduled_early < scheduled_late);
        assert!(same_start_lower_id < scheduled_late);
        assert!(scheduled_late < unscheduled);
        assert!(unscheduled < ScheduleKey { start: None, id: 7 });
    }

    #[test]
    fn ordered_ids_follow_start_time() {
        let mut index = ScheduleIndex::new();
        index.insert(&boxed(3, 13, 60));
        index.insert(&boxed(1, 10, 120));
        index.insert(&boxed(2, 15, 30));
        assert_eq!(index.ordered_ids(), vec![1, 3, 2]);
    }

    #[test]
    fn touching_endpoints_conflict() {
        let mut index = ScheduleIndex::new();
        index.insert(&boxed(1, 10, 120)); // 10:00..12:00

        // 12:00..13:00 shares the boundary instant: closed intervals clash.
        let back_to_back = boxed(2, 12, 60);
        assert_eq!(index.conflict_for(&back_to_back), Some(1));

        // 12:01..13:01 is clear.
        let mut clear = boxed(3, 12, 60);
        clear.start = Some(at(12, 1));
        assert_eq!(index.conflict_for(&clear), None);
    }

    #[test]
    fn conflict_check_excludes_self_and_unbounded_items() {
        let mut index = ScheduleIndex::new();
        let item = boxed(1, 10, 120);
        index.insert(&item);

        // An item never conflicts with its own indexed entry.
        assert_eq!(index.conflict_for(&item), None);

        // An entry with a start but no duration has no end and cannot
        // conflict.
        let mut open_ended = WorkItem::new_task(2, "open", "", Status::New);
        open_ended.start = Some(at(11, 0));
        index.insert(&open_ended);
        assert_eq!(index.conflict_for(&boxed(3, 14, 30)), None);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut index = ScheduleIndex::new();
        index.insert(&boxed(1, 10, 60));
        index.remove(1);
        index.remove(1);
        assert!(index.is_empty());
        assert!(!index.contains(1));
    }
}
