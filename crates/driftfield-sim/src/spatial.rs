//! Uniform-grid spatial hash.
//!
//! Each item is registered under every cell its bounding box overlaps, so a
//! query only has to visit the cells covering the query square. Cells that
//! become empty are deleted immediately; the map never holds empty lists.

use std::collections::HashMap;

use driftfield_core::types::Position;

/// Integer grid coordinates `(floor(x / cell), floor(y / cell))`.
pub type CellKey = (i32, i32);

#[derive(Debug, Clone)]
pub struct SpatialIndex<T> {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<T>>,
}

impl<T: Copy + Ord> SpatialIndex<T> {
    /// `cell_size` must be positive (checked by `WorldConfig::validate`).
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Total references held across all cells (an item spanning four cells
    /// counts four times).
    pub fn reference_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn cell_key(&self, x: f64, y: f64) -> CellKey {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    /// Add `item` to every cell overlapped by `position ± radius`.
    ///
    /// An item is inserted once per lifecycle (spawn to collection); cells
    /// do not check for an existing reference.
    pub fn insert(&mut self, item: T, position: &Position, radius: f64) {
        let (min, max) = self.covering(position.x, position.y, radius);
        for cx in min.0..=max.0 {
            for cy in min.1..=max.1 {
                self.cells.entry((cx, cy)).or_default().push(item);
            }
        }
    }

    /// Remove `item` from the cells it was inserted under. The caller passes
    /// the same position and radius used for `insert`. Absent items are a
    /// no-op.
    pub fn remove(&mut self, item: T, position: &Position, radius: f64) {
        let (min, max) = self.covering(position.x, position.y, radius);
        for cx in min.0..=max.0 {
            for cy in min.1..=max.1 {
                let key = (cx, cy);
                let Some(list) = self.cells.get_mut(&key) else {
                    continue;
                };
                if let Some(i) = list.iter().position(|e| *e == item) {
                    list.swap_remove(i);
                }
                if list.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
    }

    /// Items registered in any cell touching the square `[x ± range] × [y ± range]`.
    ///
    /// Results are deduplicated and returned in ascending order, so repeated
    /// queries over the same contents agree regardless of hash-map layout.
    /// Callers still filter by exact distance.
    pub fn query(&self, x: f64, y: f64, range: f64) -> Vec<T> {
        let (min, max) = self.covering(x, y, range);
        let mut found = Vec::new();
        for cx in min.0..=max.0 {
            for cy in min.1..=max.1 {
                if let Some(list) = self.cells.get(&(cx, cy)) {
                    found.extend_from_slice(list);
                }
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    fn covering(&self, x: f64, y: f64, extent: f64) -> (CellKey, CellKey) {
        let extent = extent.max(0.0);
        (
            self.cell_key(x - extent, y - extent),
            self.cell_key(x + extent, y + extent),
        )
    }
}
