//! Autonomous navigation for DRIFTFIELD.
//!
//! Implements gather-target selection, proportional steering, the autopilot
//! mode machine, and the long-jump state machine.
//! No ECS dependency; operates on plain data.

pub mod autopilot;
pub mod jump;
pub mod steering;
pub mod targeting;

pub use driftfield_core as core;
