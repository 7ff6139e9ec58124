//! Secondary collection drone.

use glam::DVec2;

use driftfield_core::constants::*;
use driftfield_core::enums::{DroneMode, ItemKind};
use driftfield_core::state::DroneView;
use driftfield_core::types::{DroneStatus, Position};

use crate::sinks::InventorySink;

#[derive(Debug, Clone)]
pub struct Drone {
    pub position: Position,
    pub mode: DroneMode,
    pub hold: Vec<ItemKind>,
    /// Inert until this tick after flying into a hazard.
    pub disrupted_until: Option<u64>,
    /// Entity currently pursued in free-roam.
    pub target: Option<hecs::Entity>,
}

impl Drone {
    /// A docked drone at `position`.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            mode: DroneMode::Docked,
            hold: Vec::new(),
            disrupted_until: None,
            target: None,
        }
    }

    /// Out of the bay (escorting or roaming).
    pub fn is_deployed(&self) -> bool {
        self.mode != DroneMode::Docked
    }

    pub fn is_disrupted(&self, tick: u64) -> bool {
        self.disrupted_until.is_some_and(|until| tick < until)
    }

    pub fn at_capacity(&self) -> bool {
        self.hold.len() >= DRONE_CAPACITY
    }

    /// Hazard hit: recalled to escort and inert for a while.
    pub fn disrupt(&mut self, tick: u64) {
        self.mode = DroneMode::Escort;
        self.target = None;
        self.disrupted_until = Some(tick + u64::from(DRONE_DISRUPT_TICKS));
    }

    /// Empty the hold into `sink` in pickup order, stopping at the first
    /// refusal. Returns how many moved.
    pub fn unload_into(&mut self, sink: &mut dyn InventorySink) -> usize {
        let mut moved = 0;
        for &item in &self.hold {
            if !sink.try_add(item) {
                break;
            }
            moved += 1;
        }
        self.hold.drain(..moved);
        moved
    }

    /// Fly toward `to` by at most one tick of travel. Returns true on arrival.
    pub fn fly_toward(&mut self, to: &Position) -> bool {
        let step = DRONE_MAX_SPEED * DT;
        let delta = DVec2::from(*to) - DVec2::from(self.position);
        if delta.length() <= step {
            self.position = *to;
            return true;
        }
        self.position = (DVec2::from(self.position) + delta.normalize() * step).into();
        false
    }

    /// What the autopilot needs for de-confliction.
    pub fn status(&self, tick: u64) -> DroneStatus {
        DroneStatus {
            position: self.position,
            mode: self.mode,
            at_capacity: self.at_capacity(),
            disrupted: self.is_disrupted(tick),
        }
    }

    pub fn view(&self, tick: u64) -> DroneView {
        DroneView {
            position: self.position,
            mode: self.mode,
            held: self.hold.len(),
            disrupted: self.is_disrupted(tick),
        }
    }
}
