//! Snapshot system: builds a FrameSnapshot from engine state.
//!
//! This system is read-only. It never modifies the registry or the ship.

use hecs::Entity;

use driftfield_core::constants::MAX_ENTITY_RADIUS;
use driftfield_core::enums::{GamePhase, Visibility};
use driftfield_core::events::SimEvent;
use driftfield_core::state::*;
use driftfield_core::types::{Observer, SimTime};

use driftfield_pilot::autopilot::NavigationState;

use crate::drone::Drone;
use crate::proximity::classify;
use crate::registry::EntityRegistry;
use crate::ship::Ship;
use crate::sinks::{CargoHold, Depot, Progression};

/// Everything the snapshot reads, borrowed from the engine.
pub struct SnapshotSources<'a> {
    pub time: &'a SimTime,
    pub phase: GamePhase,
    pub ship: &'a Ship,
    pub drone: Option<&'a Drone>,
    pub navigation: &'a NavigationState<Entity>,
    pub registry: &'a EntityRegistry,
    pub cargo: &'a CargoHold,
    pub depot: &'a Depot,
    pub progression: &'a Progression,
    pub scan_radius: f64,
    pub radar_radius: f64,
}

/// Build a complete FrameSnapshot.
pub fn build_snapshot(src: &SnapshotSources<'_>, events: Vec<SimEvent>) -> FrameSnapshot {
    let observer = src.ship.observer(src.scan_radius, src.radar_radius);

    FrameSnapshot {
        time: *src.time,
        phase: src.phase,
        ship: src.ship.view(),
        drone: src.drone.map(|d| d.view(src.time.tick)),
        autopilot: build_autopilot(src.navigation),
        contacts: build_contacts(src.registry, &observer),
        cargo: src.cargo.view(),
        depot: src.depot.view(),
        experience: src.progression.total_xp,
        population: src.registry.live_count(),
        events,
    }
}

fn build_autopilot(nav: &NavigationState<Entity>) -> AutopilotView {
    AutopilotView {
        enabled: nav.enabled,
        mode: nav.mode,
        last_target: nav.last_target.map(|t| t.position()),
        scout_point: nav.scout_point,
        manual_target: nav.manual_target,
    }
}

/// Radar contacts around the observer. Hidden entities are left out; the
/// category is only revealed inside scan range.
fn build_contacts(registry: &EntityRegistry, observer: &Observer) -> Vec<ContactView> {
    let pos = observer.position;
    registry
        .query(pos.x, pos.y, observer.radar_radius + MAX_ENTITY_RADIUS)
        .into_iter()
        .filter_map(|e| registry.entry(e))
        .filter(|(_, c)| !c.collected)
        .filter_map(|(position, c)| match classify(observer, &position, c.radius) {
            Visibility::Hidden => None,
            Visibility::Signal => Some(ContactView {
                position,
                visibility: Visibility::Signal,
                category: None,
            }),
            Visibility::Detailed => Some(ContactView {
                position,
                visibility: Visibility::Detailed,
                category: Some(c.category),
            }),
        })
        .collect()
}
