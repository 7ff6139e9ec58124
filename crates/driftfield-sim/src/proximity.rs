//! Visibility and interaction rules based on distance.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use driftfield_core::config::LootTable;
use driftfield_core::enums::Visibility;
use driftfield_core::types::{Observer, Position};

/// How much of an entity the observer can see.
///
/// Ranges are measured to the entity's edge, so a large hazard cloud shows up
/// as soon as any part of it is inside range.
pub fn classify(observer: &Observer, position: &Position, radius: f64) -> Visibility {
    let edge = observer.position.distance_to(position) - radius;
    if edge <= observer.scan_radius {
        Visibility::Detailed
    } else if edge <= observer.radar_radius {
        Visibility::Signal
    } else {
        Visibility::Hidden
    }
}

/// Circle overlap test between the ship hull and an entity.
pub fn collides(ship: &Position, ship_radius: f64, position: &Position, radius: f64) -> bool {
    ship.distance_to(position) < ship_radius + radius
}

/// Weighted draw of how many copies a pickup yields.
pub fn roll_loot(table: &LootTable, rng: &mut ChaCha8Rng) -> u32 {
    let total = table.total_weight();
    if total == 0 {
        return 0;
    }
    table.copies_for(rng.gen_range(0..total))
}
