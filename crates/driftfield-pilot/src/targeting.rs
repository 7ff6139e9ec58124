//! Gather-target selection with cooperative drone de-confliction.
//!
//! Pure functions over plain data. The caller supplies the candidate list
//! (already narrowed by the spatial index) in a stable order.

use driftfield_core::enums::{Category, DroneMode};
use driftfield_core::types::{DroneStatus, Position};

/// An entity the autopilot may consider, keyed by an opaque id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<Id> {
    pub id: Id,
    pub position: Position,
    pub category: Category,
    pub collected: bool,
}

/// True when `a` is strictly closer to `target` than `b` is.
pub fn is_closer(target: &Position, a: &Position, b: &Position) -> bool {
    a.distance_sq_to(target) < b.distance_sq_to(target)
}

/// Whether a cooperating drone should be left to pick up `target`.
///
/// Only a drone that is free-roaming, has room in its hold and is not
/// disrupted cooperates; anything else never claims targets.
pub fn drone_claims(drone: Option<&DroneStatus>, target: &Position, observer: &Position) -> bool {
    match drone {
        Some(DroneStatus {
            position,
            mode: DroneMode::FreeRoam,
            at_capacity: false,
            disrupted: false,
        }) => is_closer(target, position, observer),
        _ => false,
    }
}

/// Nearest non-collected, gatherable candidate within `radar_radius`,
/// skipping those a cooperating drone is strictly closer to.
///
/// Ties keep the earlier candidate, so a fixed input order gives a fixed answer.
pub fn select_gather_target<Id: Copy>(
    observer: &Position,
    radar_radius: f64,
    candidates: &[Candidate<Id>],
    drone: Option<&DroneStatus>,
) -> Option<Candidate<Id>> {
    let radar_sq = radar_radius * radar_radius;
    let mut best: Option<(f64, Candidate<Id>)> = None;

    for candidate in candidates {
        if candidate.collected || !candidate.category.is_gatherable() {
            continue;
        }
        let d_sq = observer.distance_sq_to(&candidate.position);
        if d_sq > radar_sq {
            continue;
        }
        if drone_claims(drone, &candidate.position, observer) {
            continue;
        }
        match best {
            Some((best_sq, _)) if best_sq <= d_sq => {}
            _ => best = Some((d_sq, *candidate)),
        }
    }

    best.map(|(_, c)| c)
}
