//! Recency history for trk.
//!
//! A bounded list of the most recently viewed work item ids: oldest at the
//! head, newest at the tail, capacity [`HISTORY_CAPACITY`]. Re-touching an
//! id promotes it to the tail instead of duplicating it, and both touch and
//! remove are O(1) via an id lookup into an intrusive slot arena (prev/next
//! indices instead of pointers).

use std::collections::HashMap;

/// Maximum number of entries retained; the oldest entry is evicted beyond
/// this.
pub const HISTORY_CAPACITY: usize = 10;

/// Sentinel index for "no slot".
const NIL: usize = usize::MAX;

#[derive(Debug, Clone)]
struct Slot {
    id: u32,
    prev: usize,
    next: usize,
}

/// Bounded most-recently-viewed list with O(1) dedup-and-promote.
#[derive(Debug, Clone)]
pub struct RecencyHistory {
    slots: Vec<Slot>,
    free: Vec<usize>,
    /// id -> slot index; always consistent with the linked sequence.
    index: HashMap<u32, usize>,
    head: usize,
    tail: usize,
}

impl Default for RecencyHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl RecencyHistory {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            head: NIL,
            tail: NIL,
        }
    }

    /// Record an access: promote an existing entry to the tail or append a
    /// fresh one, evicting the oldest entry past capacity.
    pub fn touch(&mut self, id: u32) {
        self.remove(id);
        self.link_last(id);

        if self.index.len() > HISTORY_CAPACITY {
            let oldest = self.slots[self.head].id;
            self.remove(oldest);
        }
    }

    /// Detach the entry for `id`; no-op when absent.
    pub fn remove(&mut self, id: u32) {
        let Some(slot_idx) = self.index.remove(&id) else {
            return;
        };
        let Slot { prev, next, .. } = self.slots[slot_idx];

        if prev != NIL {
            self.slots[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.slots[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.free.push(slot_idx);
    }

    /// The full sequence, oldest to most recent, as an independent copy.
    pub fn snapshot(&self) -> Vec<u32> {
        let mut ids = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;
        while cursor != NIL {
            ids.push(self.slots[cursor].id);
            cursor = self.slots[cursor].next;
        }
        ids
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn link_last(&mut self, id: u32) {
        let slot = Slot {
            id,
            prev: self.tail,
            next: NIL,
        };
        let slot_idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };

        if self.tail != NIL {
            self.slots[self.tail].next = slot_idx;
        }
        self.tail = slot_idx;
        if self.head == NIL {
            self.head = slot_idx;
        }

        self.index.insert(id, slot_idx);
    }
}
