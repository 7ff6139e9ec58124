//! Frame snapshot: the complete visible state handed to the frontend each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Position, SimTime};

/// Everything a renderer or debug overlay needs after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub ship: ShipView,
    pub drone: Option<DroneView>,
    pub autopilot: AutopilotView,
    /// Entities within radar range, in index order.
    pub contacts: Vec<ContactView>,
    pub cargo: StorageView,
    pub depot: StorageView,
    pub experience: u64,
    /// Live (uncollected) entities in the world.
    pub population: usize,
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipView {
    pub position: Position,
    pub heading: f64,
    pub speed: f64,
    pub energy: f64,
    pub hull: f64,
    /// Collisions suppressed (long-jump travel).
    pub ghost: bool,
    pub jump_phase: JumpPhaseKind,
    pub charge_stage: Option<ChargeStage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneView {
    pub position: Position,
    pub mode: DroneMode,
    pub held: usize,
    pub disrupted: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutopilotView {
    pub enabled: bool,
    pub mode: AutopilotMode,
    /// Telemetry only; not authoritative.
    pub last_target: Option<Position>,
    pub scout_point: Option<Position>,
    pub manual_target: Option<Position>,
}

/// A radar contact. The category is only revealed inside scan range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactView {
    pub position: Position,
    pub visibility: Visibility,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StorageView {
    pub count: usize,
    pub capacity: usize,
}
