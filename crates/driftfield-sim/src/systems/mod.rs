//! Per-tick systems, run by the engine in a fixed order.
//!
//! Systems are plain functions over borrowed engine state.
//! They do not own state; it all lives on the engine.

pub mod drone;
pub mod movement;
pub mod navigation;
pub mod snapshot;
