//! Per-tick bundle of everything an interaction may touch.
//!
//! Built by the engine from its own fields for the duration of one registry
//! tick; there is no global state.

use rand_chacha::ChaCha8Rng;

use driftfield_core::config::LootTable;
use driftfield_core::constants::*;
use driftfield_core::events::SimEvent;
use driftfield_core::types::Observer;

use crate::drone::Drone;
use crate::ship::Ship;
use crate::sinks::{InventorySink, ProgressionSink};

/// Rate limiter keyed on the simulation tick.
#[derive(Debug, Clone, Copy)]
pub struct Cooldown {
    period: u64,
    last: Option<u64>,
}

impl Cooldown {
    pub fn new(period: u64) -> Self {
        Self { period, last: None }
    }

    /// True (and re-armed) if at least `period` ticks passed since the last fire.
    pub fn try_fire(&mut self, tick: u64) -> bool {
        let ready = self
            .last
            .map_or(true, |last| tick.saturating_sub(last) >= self.period);
        if ready {
            self.last = Some(tick);
        }
        ready
    }
}

/// Independent throttles for repeated contact effects.
#[derive(Debug, Clone, Copy)]
pub struct Cooldowns {
    pub hazard_damage: Cooldown,
    pub hazard_warning: Cooldown,
    pub cargo_full: Cooldown,
    pub depot_full: Cooldown,
}

impl Default for Cooldowns {
    fn default() -> Self {
        Self {
            hazard_damage: Cooldown::new(HAZARD_DAMAGE_COOLDOWN_TICKS),
            hazard_warning: Cooldown::new(HAZARD_NOTIFY_COOLDOWN_TICKS),
            cargo_full: Cooldown::new(CARGO_FULL_NOTIFY_COOLDOWN_TICKS),
            depot_full: Cooldown::new(DEPOT_FULL_NOTIFY_COOLDOWN_TICKS),
        }
    }
}

pub struct InteractionContext<'a> {
    pub ship: &'a mut Ship,
    pub drone: Option<&'a mut Drone>,
    pub inventory: &'a mut dyn InventorySink,
    pub progression: &'a mut dyn ProgressionSink,
    pub events: &'a mut Vec<SimEvent>,
    pub rng: &'a mut ChaCha8Rng,
    pub loot_table: &'a LootTable,
    pub cooldowns: &'a mut Cooldowns,
    pub scan_radius: f64,
    pub radar_radius: f64,
    pub tick: u64,
}

impl InteractionContext<'_> {
    pub fn observer(&self) -> Observer {
        self.ship.observer(self.scan_radius, self.radar_radius)
    }

    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }
}
