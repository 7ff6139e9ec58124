//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Autopilot ---
    /// Engage (in gather mode) or disengage the autopilot.
    ToggleAutopilot,
    /// Force a mode, engaging the autopilot if needed.
    SetAutopilotMode { mode: AutopilotMode },
    /// Fly to a point (e.g. a map click), then disengage.
    SetManualTarget { x: f64, y: f64 },

    // --- Manual flight ---
    /// Held input state. `turn` is in [-1, 1]; persists until replaced.
    ManualInput { turn: f64, thrust: bool, brake: bool },

    // --- Long jump ---
    AttemptJump,
    CancelJump,

    // --- Drone ---
    SetDroneMode { mode: DroneMode },

    // --- Debug ---
    /// Hazards stop affecting the ship and drone.
    SetGodMode { enabled: bool },

    // --- Simulation control ---
    Pause,
    Resume,
}
