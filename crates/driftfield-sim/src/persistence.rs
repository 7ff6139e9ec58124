//! Flat save format for the entity population.
//!
//! Only positions and categories are stored. Loading always rebuilds the
//! spatial index from scratch; index layout is never persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use driftfield_core::enums::Category;
use driftfield_core::types::Position;

use crate::registry::EntityRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub x: f64,
    pub y: f64,
    pub category: Category,
    pub collected: bool,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("malformed entity records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Live entities in stable (entity id) order.
pub fn export_records(registry: &EntityRegistry) -> Vec<EntityRecord> {
    registry
        .entities()
        .into_iter()
        .filter_map(|e| registry.entry(e))
        .map(|(pos, c)| EntityRecord {
            x: pos.x,
            y: pos.y,
            category: c.category,
            collected: c.collected,
        })
        .collect()
}

/// Replace the registry contents with `records`. Collected records are
/// dropped; the next tick backfills any deficit. Returns how many loaded.
pub fn import_records(registry: &mut EntityRegistry, records: &[EntityRecord]) -> usize {
    registry.clear();
    let mut loaded = 0;
    for record in records.iter().filter(|r| !r.collected) {
        registry.spawn_at(record.category, Position::new(record.x, record.y));
        loaded += 1;
    }
    log::info!(
        "restored {loaded} entities ({} collected records skipped)",
        records.len() - loaded
    );
    loaded
}

pub fn records_to_json(records: &[EntityRecord]) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(records)?)
}

pub fn records_from_json(json: &str) -> Result<Vec<EntityRecord>, PersistenceError> {
    Ok(serde_json::from_str(json)?)
}
