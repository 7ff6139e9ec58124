//! Game loop thread. Runs the simulation engine and publishes snapshots.
//!
//! The engine moves into the thread and comes back out through `join`, so
//! the runner can save the world after the loop stops. Commands arrive via
//! an `mpsc` channel; the latest snapshot is stored in shared state for
//! polling.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use driftfield_core::commands::PlayerCommand;
use driftfield_core::constants::TICK_RATE;
use driftfield_core::state::FrameSnapshot;
use driftfield_sim::SimulationEngine;

use crate::error::AppError;
use crate::state::{GameLoopCommand, SharedSnapshot};

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// How the loop spaces out ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Sleep to hold the nominal tick rate.
    Realtime,
    /// Tick as fast as possible.
    Unthrottled,
}

#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    pub pacing: Pacing,
    /// Stop after this many loop iterations. `None` runs until shutdown.
    pub tick_limit: Option<u64>,
}

/// Owner side of a running game loop.
pub struct GameLoopHandle {
    command_tx: mpsc::Sender<GameLoopCommand>,
    thread: JoinHandle<SimulationEngine>,
}

impl GameLoopHandle {
    /// Forward a player command. Returns false once the loop has stopped.
    pub fn send(&self, command: PlayerCommand) -> bool {
        self.command_tx
            .send(GameLoopCommand::PlayerCommand(command))
            .is_ok()
    }

    /// Wait for the loop to reach its tick limit and take the engine back.
    /// Blocks forever on an unlimited loop; use `shutdown` there.
    pub fn join(self) -> Result<SimulationEngine, AppError> {
        let GameLoopHandle { command_tx, thread } = self;
        let result = thread.join().map_err(|_| AppError::LoopPanicked);
        drop(command_tx);
        result
    }

    /// Ask the loop to stop after the current tick and take the engine back.
    pub fn shutdown(self) -> Result<SimulationEngine, AppError> {
        // A send error means the loop already exited on its own.
        let _ = self.command_tx.send(GameLoopCommand::Shutdown);
        self.join()
    }
}

/// Spawns the game loop in a new thread.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    settings: LoopSettings,
    latest_snapshot: SharedSnapshot,
) -> Result<GameLoopHandle, AppError> {
    let (command_tx, command_rx) = mpsc::channel::<GameLoopCommand>();

    let thread = std::thread::Builder::new()
        .name("driftfield-game-loop".into())
        .spawn(move || run_game_loop(engine, command_rx, settings, &latest_snapshot))
        .map_err(AppError::Spawn)?;

    Ok(GameLoopHandle { command_tx, thread })
}

/// The game loop. Runs until the tick limit, a Shutdown command or channel
/// disconnect, then hands the engine back.
fn run_game_loop(
    mut engine: SimulationEngine,
    command_rx: mpsc::Receiver<GameLoopCommand>,
    settings: LoopSettings,
    latest_snapshot: &std::sync::Mutex<Option<FrameSnapshot>>,
) -> SimulationEngine {
    let mut next_tick_time = Instant::now();
    let mut iterations = 0u64;

    loop {
        if settings.tick_limit.is_some_and(|limit| iterations >= limit) {
            log::debug!("game loop reached its limit of {iterations} ticks");
            return engine;
        }

        // 1. Drain all pending commands
        loop {
            match command_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(command)) => engine.queue_command(command),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    log::debug!("game loop stopping after {iterations} ticks");
                    return engine;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (the engine handles pause internally)
        let snapshot = engine.tick();
        iterations += 1;

        // 3. Publish for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Hold the tick rate
        if settings.pacing == Pacing::Realtime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind; reset rather than catch up in a burst.
                next_tick_time = now;
            }
        }
    }
}
