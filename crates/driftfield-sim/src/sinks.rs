//! Collaborators that receive pickups and experience.
//!
//! Capacity failures are reported as `false`; nothing here returns an error.

use driftfield_core::enums::ItemKind;
use driftfield_core::state::StorageView;

/// Somewhere items can be placed, one at a time.
pub trait InventorySink {
    /// Store one item. Returns false when full.
    fn try_add(&mut self, item: ItemKind) -> bool;
    fn current_count(&self) -> usize;
    fn capacity(&self) -> usize;

    fn is_full(&self) -> bool {
        self.current_count() >= self.capacity()
    }

    fn free_slots(&self) -> usize {
        self.capacity().saturating_sub(self.current_count())
    }
}

/// Receiver for experience points.
pub trait ProgressionSink {
    fn grant_xp(&mut self, amount: u32);
}

/// Bounded list of items, shared by the ship hold and the depot.
#[derive(Debug, Clone, Default)]
struct ItemStore {
    items: Vec<ItemKind>,
    capacity: usize,
}

impl ItemStore {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    fn try_add(&mut self, item: ItemKind) -> bool {
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push(item);
        true
    }
}

/// The ship's cargo hold.
#[derive(Debug, Clone, Default)]
pub struct CargoHold {
    store: ItemStore,
}

impl CargoHold {
    pub fn new(capacity: usize) -> Self {
        Self {
            store: ItemStore::with_capacity(capacity),
        }
    }

    pub fn items(&self) -> &[ItemKind] {
        &self.store.items
    }

    pub fn count_of(&self, kind: ItemKind) -> usize {
        self.store.items.iter().filter(|&&i| i == kind).count()
    }

    /// Move items into `target` in load order, stopping at the first refusal.
    /// Items that did not fit stay in the hold. Returns how many moved.
    pub fn transfer_into(&mut self, target: &mut dyn InventorySink) -> usize {
        let mut moved = 0;
        for &item in &self.store.items {
            if !target.try_add(item) {
                break;
            }
            moved += 1;
        }
        self.store.items.drain(..moved);
        moved
    }

    pub fn view(&self) -> StorageView {
        StorageView {
            count: self.current_count(),
            capacity: self.capacity(),
        }
    }
}

impl InventorySink for CargoHold {
    fn try_add(&mut self, item: ItemKind) -> bool {
        self.store.try_add(item)
    }

    fn current_count(&self) -> usize {
        self.store.items.len()
    }

    fn capacity(&self) -> usize {
        self.store.capacity
    }
}

/// Long-term storage at the depot.
#[derive(Debug, Clone, Default)]
pub struct Depot {
    store: ItemStore,
}

impl Depot {
    pub fn new(capacity: usize) -> Self {
        Self {
            store: ItemStore::with_capacity(capacity),
        }
    }

    pub fn items(&self) -> &[ItemKind] {
        &self.store.items
    }

    pub fn view(&self) -> StorageView {
        StorageView {
            count: self.current_count(),
            capacity: self.capacity(),
        }
    }
}

impl InventorySink for Depot {
    fn try_add(&mut self, item: ItemKind) -> bool {
        self.store.try_add(item)
    }

    fn current_count(&self) -> usize {
        self.store.items.len()
    }

    fn capacity(&self) -> usize {
        self.store.capacity
    }
}

/// Running experience total.
#[derive(Debug, Clone, Copy, Default)]
pub struct Progression {
    pub total_xp: u64,
}

impl ProgressionSink for Progression {
    fn grant_xp(&mut self, amount: u32) {
        self.total_xp += u64::from(amount);
    }
}
