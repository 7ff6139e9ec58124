//! State shared between the runner and the game loop thread.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use driftfield_core::commands::PlayerCommand;
use driftfield_core::state::FrameSnapshot;

/// Commands sent from the runner to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest snapshot, written by the loop after each tick.
pub type SharedSnapshot = Arc<Mutex<Option<FrameSnapshot>>>;

pub fn shared_snapshot() -> SharedSnapshot {
    Arc::new(Mutex::new(None))
}

/// End-of-run figures taken from the final snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed: f64,
    pub experience: u64,
    pub cargo: usize,
    pub depot: usize,
    pub hull: f64,
    pub energy: f64,
    pub population: usize,
}

impl RunSummary {
    pub fn from_snapshot(snapshot: &FrameSnapshot) -> Self {
        Self {
            ticks: snapshot.time.tick,
            elapsed: snapshot.time.elapsed_secs,
            experience: snapshot.experience,
            cargo: snapshot.cargo.count,
            depot: snapshot.depot.count,
            hull: snapshot.ship.hull,
            energy: snapshot.ship.energy,
            population: snapshot.population,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks ({:.1}s): xp {}, cargo {}, depot {}, hull {:.0}, energy {:.0}, population {}",
            self.ticks,
            self.elapsed,
            self.experience,
            self.cargo,
            self.depot,
            self.hull,
            self.energy,
            self.population
        )
    }
}
