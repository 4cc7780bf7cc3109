//! The board: trk's only mutating entry point.
//!
//! Composes the entity store, id allocator, schedule index, epic rollup,
//! and recency history so every public operation leaves all invariants
//! intact: no two admitted time boxes overlap, epic aggregates are always
//! in sync with the live child set, and the history never references a
//! removed item. Single-writer by design; embedding in a concurrent
//! context requires serializing mutations externally, or two overlapping
//! admissions could both pass their checks.

use chrono::{Duration, NaiveDateTime};

use crate::error::{Error, Result};
use crate::history::RecencyHistory;
use crate::model::{ItemKind, Kind, Status, WorkItem};
use crate::rollup::rollup;
use crate::schedule::ScheduleIndex;
use crate::store::{EntityStore, IdAllocator};

/// In-memory work item board.
#[derive(Debug, Clone, Default)]
pub struct Board {
    store: EntityStore,
    ids: IdAllocator,
    schedule: ScheduleIndex,
    history: RecencyHistory,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a flat task. A time-boxed task is admitted only when its
    /// closed interval is clear of every other admitted item; a rejected
    /// create changes nothing and consumes no id.
    pub fn create_task(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        status: Status,
        duration: Option<Duration>,
        start: Option<NaiveDateTime>,
    ) -> Result<u32> {
        self.check_admissible(start, duration, None)?;

        let id = self.ids.next();
        let mut task = WorkItem::new_task(id, title, description, status);
        task.duration = duration;
        task.start = start;
        self.schedule.insert(&task);
        self.store.put(task);
        Ok(id)
    }

    /// Create an epic. Status and time fields are derived from children,
    /// so a fresh epic is `New` and unscheduled.
    pub fn create_epic(&mut self, title: impl Into<String>, description: impl Into<String>) -> u32 {
        let id = self.ids.next();
        self.store.put(WorkItem::new_epic(id, title, description));
        id
    }

    /// Create a subtask owned by `epic_id`, append it to the epic's child
    /// list, and re-roll the epic up.
    pub fn create_subtask(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        status: Status,
        epic_id: u32,
        duration: Option<Duration>,
        start: Option<NaiveDateTime>,
    ) -> Result<u32> {
        if self
            .store
            .get(epic_id)
            .map(|item| item.kind_of() != Kind::Epic)
            .unwrap_or(true)
        {
            return Err(Error::EpicNotFound(epic_id));
        }
        self.check_admissible(start, duration, None)?;

        let id = self.ids.next();
        let mut subtask = WorkItem::new_subtask(id, title, description, status, epic_id);
        subtask.duration = duration;
        subtask.start = start;
        self.schedule.insert(&subtask);
        self.store.put(subtask);

        if let Some(children) = self
            .store
            .get_mut(epic_id)
            .and_then(|epic| epic.subtask_ids_mut())
        {
            children.push(id);
        }
        self.rollup_epic(epic_id);
        Ok(id)
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Replace a stored record with an updated one of the same id.
    ///
    /// Kind and parent/child links are taken from the stored record, never
    /// from the caller. A time-boxed update is conflict-checked against
    /// every other item first; on rejection nothing changes. Epic status
    /// and time fields are recomputed from children regardless of what the
    /// caller supplied.
    pub fn update(&mut self, mut item: WorkItem) -> Result<()> {
        let stored = self.store.get(item.id).ok_or(Error::NotFound(item.id))?;
        item.kind = stored.kind.clone();
        let kind = item.kind_of();

        if kind != Kind::Epic {
            self.check_admissible(item.start, item.duration, Some(item.id))?;
        }

        let id = item.id;
        let epic_to_refresh = match kind {
            Kind::Epic => Some(id),
            Kind::Subtask => item.epic_id(),
            Kind::Task => None,
        };

        if kind != Kind::Epic {
            self.schedule.remove(id);
            self.schedule.insert(&item);
        }
        self.store.put(item);

        if let Some(epic_id) = epic_to_refresh {
            self.rollup_epic(epic_id);
        }
        Ok(())
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Remove an item by id. Epics cascade to every child subtask;
    /// removing a subtask re-rolls its former parent. Returns `false` for
    /// unknown ids so deletes are idempotent.
    pub fn remove_by_id(&mut self, id: u32) -> bool {
        let Some(kind) = self.store.get(id).map(WorkItem::kind_of) else {
            return false;
        };

        match kind {
            Kind::Task => self.drop_item(id),
            Kind::Epic => {
                let children = self
                    .store
                    .get(id)
                    .and_then(|epic| epic.subtask_ids().map(<[u32]>::to_vec))
                    .unwrap_or_default();
                for child in children {
                    self.drop_item(child);
                }
                self.drop_item(id);
            }
            Kind::Subtask => {
                let parent = self.store.get(id).and_then(WorkItem::epic_id);
                self.drop_item(id);
                if let Some(epic_id) = parent {
                    self.unlink_child(epic_id, id);
                    self.rollup_epic(epic_id);
                }
            }
        }
        true
    }

    /// Remove every flat task.
    pub fn clear_tasks(&mut self) {
        for id in self.ids_of_kind(Kind::Task) {
            self.drop_item(id);
        }
    }

    /// Remove every subtask, leaving empty epics behind (each re-rolled).
    pub fn clear_subtasks(&mut self) {
        for id in self.ids_of_kind(Kind::Subtask) {
            let parent = self.store.get(id).and_then(WorkItem::epic_id);
            self.drop_item(id);
            if let Some(epic_id) = parent {
                self.unlink_child(epic_id, id);
            }
        }
        for epic_id in self.ids_of_kind(Kind::Epic) {
            self.rollup_epic(epic_id);
        }
    }

    /// Remove every epic and, transitively, every subtask.
    pub fn clear_epics(&mut self) {
        for id in self.ids_of_kind(Kind::Subtask) {
            self.drop_item(id);
        }
        for id in self.ids_of_kind(Kind::Epic) {
            self.drop_item(id);
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Look up an item and record the access in the recency history.
    pub fn get(&mut self, id: u32) -> Option<&WorkItem> {
        if self.store.contains(id) {
            self.history.touch(id);
        }
        self.store.get(id)
    }

    /// Look up an item without recording the access. Used for internal
    /// composition and displays that should not disturb the history.
    pub fn item(&self, id: u32) -> Option<&WorkItem> {
        self.store.get(id)
    }

    pub fn all_of_kind(&self, kind: Kind) -> Vec<&WorkItem> {
        self.store.all_of_kind(kind)
    }

    pub fn all_tasks(&self) -> Vec<&WorkItem> {
        self.all_of_kind(Kind::Task)
    }

    pub fn all_epics(&self) -> Vec<&WorkItem> {
        self.all_of_kind(Kind::Epic)
    }

    pub fn all_subtasks(&self) -> Vec<&WorkItem> {
        self.all_of_kind(Kind::Subtask)
    }

    /// Live subtasks of an epic in insertion order; empty for unknown ids.
    pub fn subtasks_of_epic(&self, epic_id: u32) -> Vec<&WorkItem> {
        self.store
            .get(epic_id)
            .and_then(WorkItem::subtask_ids)
            .map(|ids| ids.iter().filter_map(|id| self.store.get(*id)).collect())
            .unwrap_or_default()
    }

    /// The prioritized view: every time-boxed item in schedule order.
    pub fn prioritized(&self) -> Vec<&WorkItem> {
        self.schedule
            .ordered_ids()
            .into_iter()
            .filter_map(|id| self.store.get(id))
            .collect()
    }

    /// Recently viewed items, oldest first.
    pub fn history(&self) -> Vec<&WorkItem> {
        self.history
            .snapshot()
            .into_iter()
            .filter_map(|id| self.store.get(id))
            .collect()
    }

    /// Raw history ids for the persistence sidecar.
    pub fn history_ids(&self) -> Vec<u32> {
        self.history.snapshot()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // =========================================================================
    // Reload hooks (persistence layer)
    // =========================================================================

    /// Install an already-persisted item, bypassing admission control: a
    /// saved set was conflict-free when written. Links are not patched
    /// here; the loader appends children and re-rolls epics itself.
    pub(crate) fn restore_item(&mut self, item: WorkItem) {
        self.ids.reserve_through(item.id);
        if item.kind_of() != Kind::Epic {
            self.schedule.insert(&item);
        }
        self.store.put(item);
    }

    pub(crate) fn link_subtask(&mut self, epic_id: u32, subtask_id: u32) {
        if let Some(children) = self
            .store
            .get_mut(epic_id)
            .and_then(|epic| epic.subtask_ids_mut())
        {
            children.push(subtask_id);
        }
    }

    pub(crate) fn refresh_epic(&mut self, epic_id: u32) {
        self.rollup_epic(epic_id);
    }

    /// Replay persisted history ids; ids that no longer resolve are
    /// dropped.
    pub(crate) fn replay_history(&mut self, ids: &[u32]) {
        for &id in ids {
            if self.store.contains(id) {
                self.history.touch(id);
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Reject a candidate time box that overlaps any admitted item.
    /// `exclude` carries the candidate's own id on update.
    fn check_admissible(
        &self,
        start: Option<NaiveDateTime>,
        duration: Option<Duration>,
        exclude: Option<u32>,
    ) -> Result<()> {
        if let (Some(start), Some(duration)) = (start, duration) {
            if let Some(other) = self.schedule.conflict_with(start, start + duration, exclude) {
                return Err(Error::ScheduleConflict { id: other });
            }
        }
        Ok(())
    }

    /// Scrub one item from storage, the schedule, and the history.
    fn drop_item(&mut self, id: u32) {
        self.store.delete(id);
        self.schedule.remove(id);
        self.history.remove(id);
    }

    fn unlink_child(&mut self, epic_id: u32, subtask_id: u32) {
        if let Some(children) = self
            .store
            .get_mut(epic_id)
            .and_then(|epic| epic.subtask_ids_mut())
        {
            children.retain(|&child| child != subtask_id);
        }
    }

    fn ids_of_kind(&self, kind: Kind) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .store
            .iter()
            .filter(|item| item.kind_of() == kind)
            .map(|item| item.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Recompute an epic's derived status and time span from its live
    /// children. Runs synchronously inside every mutation that touches the
    /// child set, so reads always observe a consistent aggregate.
    fn rollup_epic(&mut self, epic_id: u32) {
        let Some(epic) = self.store.get(epic_id) else {
            // A subtask outliving its epic is a programming error, not a
            // user error.
            debug_assert!(false, "rollup target epic {epic_id} missing");
            return;
        };
        let child_ids = epic.subtask_ids().map(<[u32]>::to_vec).unwrap_or_default();
        let children: Vec<&WorkItem> = child_ids
            .iter()
            .filter_map(|id| self.store.get(*id))
            .collect();
        debug_assert_eq!(
            children.len(),
            child_ids.len(),
            "every child id of epic {epic_id} must resolve"
        );
        let derived = rollup(&children);

        if let Some(epic) = self.store.get_mut(epic_id) {
            epic.status = derived.status;
            epic.duration = Some(derived.duration);
            epic.start = derived.start;
            if let ItemKind::Epic { end, .. } = &mut epic.kind {
                *end = derived.end;
            }
        }
    }
}
