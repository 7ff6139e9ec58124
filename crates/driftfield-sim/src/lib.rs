//! Simulation engine for DRIFTFIELD.
//!
//! Owns the entity registry (a hecs world kept in lockstep with a spatial
//! hash), runs systems at a fixed tick rate, and produces FrameSnapshots.

pub mod context;
pub mod drone;
pub mod engine;
pub mod interaction;
pub mod persistence;
pub mod proximity;
pub mod registry;
pub mod ship;
pub mod sinks;
pub mod spatial;
pub mod systems;

pub use driftfield_core as core;
pub use engine::SimulationEngine;

#[cfg(test)]
mod tests;
