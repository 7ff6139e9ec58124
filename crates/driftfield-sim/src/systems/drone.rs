//! Drone behaviour system.
//!
//! Escort keeps station behind the ship. Free-roam picks the nearest ore-like
//! entity within drone radar, collects it one item at a time and ferries a
//! full hold back to the ship.

use std::f64::consts::PI;

use driftfield_core::constants::*;
use driftfield_core::enums::DroneMode;
use driftfield_core::types::Position;

use driftfield_pilot::targeting::select_gather_target;

use crate::drone::Drone;
use crate::registry::EntityRegistry;
use crate::ship::Ship;
use crate::sinks::{CargoHold, InventorySink, Progression, ProgressionSink};

/// Run one tick of drone behaviour.
pub fn run(
    drone: &mut Drone,
    ship: &Ship,
    registry: &mut EntityRegistry,
    cargo: &mut CargoHold,
    progression: &mut Progression,
    current_tick: u64,
) {
    if drone.is_disrupted(current_tick) {
        return;
    }
    if drone.disrupted_until.take().is_some() {
        log::debug!("drone recovered from disruption");
    }

    match drone.mode {
        DroneMode::Docked => {
            drone.position = ship.position;
            drone.target = None;
        }
        DroneMode::Escort => {
            drone.fly_toward(&escort_station(ship));
        }
        DroneMode::FreeRoam if drone.at_capacity() => {
            drone.target = None;
            drone.fly_toward(&ship.position);
            if drone.position.distance_to(&ship.position) <= DRONE_REACH + ship.collision_radius {
                let moved = drone.unload_into(cargo);
                if moved > 0 {
                    log::debug!("drone unloaded {moved} item(s), hold {}", cargo.current_count());
                }
            }
        }
        DroneMode::FreeRoam => roam(drone, ship, registry, progression),
    }
}

/// Trailing point behind the ship.
fn escort_station(ship: &Ship) -> Position {
    ship.position.project(ship.heading + PI, DRONE_ESCORT_DISTANCE)
}

fn roam(drone: &mut Drone, ship: &Ship, registry: &mut EntityRegistry, progression: &mut Progression) {
    let still_valid = drone.target.and_then(|e| registry.entry(e)).is_some_and(|(pos, c)| {
        !c.collected && pos.distance_to(&drone.position) <= DRONE_RADAR_RADIUS
    });
    if !still_valid {
        let candidates: Vec<_> = registry
            .candidates(&drone.position, DRONE_RADAR_RADIUS)
            .into_iter()
            .filter(|c| c.category.loot_item().is_some())
            .collect();
        drone.target = select_gather_target(&drone.position, DRONE_RADAR_RADIUS, &candidates, None)
            .map(|c| c.id);
    }

    let Some(target) = drone.target else {
        drone.fly_toward(&escort_station(ship));
        return;
    };
    let Some((pos, collectible)) = registry.entry(target) else {
        drone.target = None;
        return;
    };

    drone.fly_toward(&pos);
    if drone.position.distance_to(&pos) > DRONE_REACH + collectible.radius {
        return;
    }
    if let Some(item) = collectible.category.loot_item() {
        drone.hold.push(item);
        progression.grant_xp(collectible.category.xp_per_copy());
        registry.mark_collected(target);
        log::trace!("drone collected {item:?}, hold {}", drone.hold.len());
    }
    drone.target = None;
}
