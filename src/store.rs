//! Entity storage for trk.
//!
//! A volatile id-to-item map plus the monotonic id allocator. The store
//! makes no persistence guarantees; durable state is the persistence
//! layer's concern. All invariant-preserving logic lives in the board; the
//! store is deliberately dumb.

use std::collections::HashMap;

use crate::model::{Kind, WorkItem};

/// Volatile canonical storage of work items by id.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    items: HashMap<u32, WorkItem>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u32) -> Option<&WorkItem> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut WorkItem> {
        self.items.get_mut(&id)
    }

    pub fn put(&mut self, item: WorkItem) {
        self.items.insert(item.id, item);
    }

    pub fn delete(&mut self, id: u32) -> Option<WorkItem> {
        self.items.remove(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.items.contains_key(&id)
    }

    /// All items of one kind, sorted by id for stable listings.
    pub fn all_of_kind(&self, kind: Kind) -> Vec<&WorkItem> {
        let mut items: Vec<_> = self
            .items
            .values()
            .filter(|item| item.kind_of() == kind)
            .collect();
        items.sort_by_key(|item| item.id);
        items
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Monotonic id source. Ids start at 1 and are never reused within a
/// process lifetime, even after removal.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Make sure future ids exceed `id`; used when reloading persisted
    /// items so loaded ids are never handed out again.
    pub fn reserve_through(&mut self, id: u32) {
        if id >= self.next {
            self.next = id + 1;
        }
    }
}
