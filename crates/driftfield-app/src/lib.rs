//! DRIFTFIELD headless runner.
//!
//! Wires the simulation engine to a paced game-loop thread, initializes
//! logging and turns simulation events into log lines.

pub mod error;
pub mod game_loop;
pub mod logging;
pub mod state;

pub use driftfield_core as core;
pub use error::AppError;
pub use logging::init as init_logging;
