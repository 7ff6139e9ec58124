//! ECS components for hecs entities.
//!
//! Components are plain data structs with no behaviour.
//! Game logic lives in the registry and systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::{Category, ItemKind};

/// A collectible world object. Spawned together with a `Position`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collectible {
    pub category: Category,
    /// Fixed at construction; see `Category::radius`.
    pub radius: f64,
    /// Set once on pickup. A collected entity is already out of the spatial
    /// index and is despawned at the next sweep.
    pub collected: bool,
}

impl Collectible {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            radius: category.radius(),
            collected: false,
        }
    }
}

/// Sub-items granted when a recovered cargo container is picked up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Payload {
    pub items: Vec<ItemKind>,
}
