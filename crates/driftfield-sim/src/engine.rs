//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the entity registry, the ship and its
//! collaborators, processes player commands, runs all systems in a fixed
//! order, and produces `FrameSnapshot`s. Completely headless, enabling
//! deterministic testing.

use std::collections::VecDeque;

use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use driftfield_core::commands::PlayerCommand;
use driftfield_core::config::WorldConfig;
use driftfield_core::enums::{ColorTag, DroneMode, GamePhase, SoundEffect};
use driftfield_core::events::{NotificationSink, SimEvent};
use driftfield_core::state::FrameSnapshot;
use driftfield_core::types::{Position, SimTime};

use driftfield_pilot::autopilot::NavigationState;
use driftfield_pilot::jump::{self, CancelReason, JumpEvent, JumpPhase};

use crate::context::{Cooldowns, InteractionContext};
use crate::drone::Drone;
use crate::persistence::{self, EntityRecord};
use crate::registry::{EntityRegistry, TickReport};
use crate::ship::{Ship, ShipInput};
use crate::sinks::{CargoHold, Depot, Progression};
use crate::systems;
use crate::systems::snapshot::SnapshotSources;

/// The simulation engine. Owns the world and all sim state.
pub struct SimulationEngine {
    config: WorldConfig,
    registry: EntityRegistry,
    ship: Ship,
    drone: Option<Drone>,
    navigation: NavigationState<Entity>,
    cargo: CargoHold,
    depot: Depot,
    progression: Progression,
    cooldowns: Cooldowns,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    input: ShipInput,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<SimEvent>,
    notifier: Option<Box<dyn NotificationSink + Send>>,
    last_report: TickReport,
}

impl SimulationEngine {
    /// Create an engine and populate the world. `config` is expected to have
    /// passed `WorldConfig::validate` (the loaders do this).
    pub fn new(config: WorldConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut registry = EntityRegistry::new(&config);
        registry.initialize(config.target_population, &mut rng);

        let ship = Ship::new(config.home_base);
        let drone = config.drone_enabled.then(|| Drone::new(ship.position));

        log::info!(
            "simulation ready: seed {}, world {:.0}x{:.0}, drone {}",
            config.seed,
            config.world_width,
            config.world_height,
            if drone.is_some() { "installed" } else { "absent" }
        );

        Self {
            registry,
            ship,
            drone,
            navigation: NavigationState::new(),
            cargo: CargoHold::new(config.cargo_capacity),
            depot: Depot::new(config.depot_capacity),
            progression: Progression::default(),
            cooldowns: Cooldowns::default(),
            time: SimTime::default(),
            phase: GamePhase::Active,
            rng,
            input: ShipInput::default(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            notifier: None,
            last_report: TickReport::default(),
            config,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Forward every emitted event to `sink` from now on.
    pub fn attach_notifier(&mut self, sink: Box<dyn NotificationSink + Send>) {
        self.notifier = Some(sink);
    }

    pub fn detach_notifier(&mut self) -> Option<Box<dyn NotificationSink + Send>> {
        self.notifier.take()
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> FrameSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        if let Some(sink) = self.notifier.as_mut() {
            for event in &events {
                sink.deliver(event);
            }
        }

        systems::snapshot::build_snapshot(
            &SnapshotSources {
                time: &self.time,
                phase: self.phase,
                ship: &self.ship,
                drone: self.drone.as_ref(),
                navigation: &self.navigation,
                registry: &self.registry,
                cargo: &self.cargo,
                depot: &self.depot,
                progression: &self.progression,
                scan_radius: self.config.scan_radius,
                radar_radius: self.config.radar_radius,
            },
            events,
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn drone(&self) -> Option<&Drone> {
        self.drone.as_ref()
    }

    pub fn navigation(&self) -> &NavigationState<Entity> {
        &self.navigation
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn cargo(&self) -> &CargoHold {
        &self.cargo
    }

    pub fn depot(&self) -> &Depot {
        &self.depot
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Counts from the most recent registry tick.
    pub fn last_report(&self) -> TickReport {
        self.last_report
    }

    /// Entity population as flat save records.
    pub fn export_entities(&self) -> Vec<EntityRecord> {
        persistence::export_records(&self.registry)
    }

    /// Replace the entity population from save records.
    pub fn restore_entities(&mut self, records: &[EntityRecord]) -> usize {
        self.navigation.last_target = None;
        if let Some(drone) = self.drone.as_mut() {
            drone.target = None;
        }
        persistence::import_records(&mut self.registry, records)
    }

    /// Mutable access to the ship (scenario setup in tests).
    #[cfg(test)]
    pub fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }

    /// Mutable access to the cargo hold (scenario setup in tests).
    #[cfg(test)]
    pub fn cargo_mut(&mut self) -> &mut CargoHold {
        &mut self.cargo
    }

    /// Mutable access to the registry (scenario setup in tests).
    #[cfg(test)]
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::ToggleAutopilot => {
                let on = self.navigation.toggle();
                let state = if on { "engaged" } else { "disengaged" };
                self.events.push(SimEvent::notify(
                    format!("Autopilot {state}"),
                    ColorTag::Info,
                    "",
                ));
            }
            PlayerCommand::SetAutopilotMode { mode } => {
                self.navigation.force_mode(mode);
            }
            PlayerCommand::SetManualTarget { x, y } => {
                let point = Position::new(x, y);
                if !self.navigation.set_manual_target(point, &self.config.bounds()) {
                    self.events.push(SimEvent::notify(
                        "Target out of range",
                        ColorTag::Warning,
                        format!("({x:.0}, {y:.0}) lies outside known space"),
                    ));
                    self.events.push(SimEvent::sound(SoundEffect::Denied));
                }
            }
            PlayerCommand::ManualInput { turn, thrust, brake } => {
                self.input = ShipInput { turn, thrust, brake };
            }
            PlayerCommand::AttemptJump => self.attempt_jump(),
            PlayerCommand::CancelJump => {
                if matches!(self.ship.jump, JumpPhase::Charging { .. }) {
                    self.ship.jump = JumpPhase::Idle;
                    systems::movement::report_jump_event(
                        &JumpEvent::Cancelled(CancelReason::Requested),
                        &mut self.events,
                    );
                }
            }
            PlayerCommand::SetDroneMode { mode } => self.set_drone_mode(mode),
            PlayerCommand::SetGodMode { enabled } => {
                log::debug!("god mode {}", if enabled { "on" } else { "off" });
                self.ship.god_mode = enabled;
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
        }
    }

    fn attempt_jump(&mut self) {
        match jump::attempt_jump(
            &self.ship.jump,
            &self.ship.position,
            self.ship.heading,
            self.ship.energy,
            &self.config.bounds(),
        ) {
            Ok(phase) => {
                log::debug!("jump charging from energy {:.1}", self.ship.energy);
                self.ship.jump = phase;
                self.events.push(SimEvent::sound(SoundEffect::JumpSpool));
            }
            Err(rejection) => {
                systems::movement::report_jump_event(&JumpEvent::Rejected(rejection), &mut self.events);
            }
        }
    }

    fn set_drone_mode(&mut self, mode: DroneMode) {
        let tick = self.time.tick;
        let Some(drone) = self.drone.as_mut() else {
            self.events.push(SimEvent::notify("No drone installed", ColorTag::Warning, ""));
            self.events.push(SimEvent::sound(SoundEffect::Denied));
            return;
        };
        if drone.is_disrupted(tick) {
            self.events.push(SimEvent::notify(
                "Drone offline",
                ColorTag::Warning,
                "Recovering from interference",
            ));
            self.events.push(SimEvent::sound(SoundEffect::Denied));
            return;
        }
        if mode == DroneMode::Docked {
            drone.position = self.ship.position;
            let moved = drone.unload_into(&mut self.cargo);
            log::debug!("drone docked, unloaded {moved} item(s)");
        }
        drone.mode = mode;
        drone.target = None;
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let tick = self.time.tick;

        // 1. Registry: sweep, backfill, collisions
        let mut ctx = InteractionContext {
            ship: &mut self.ship,
            drone: self.drone.as_mut(),
            inventory: &mut self.cargo,
            progression: &mut self.progression,
            events: &mut self.events,
            rng: &mut self.rng,
            loot_table: &self.config.loot_table,
            cooldowns: &mut self.cooldowns,
            scan_radius: self.config.scan_radius,
            radar_radius: self.config.radar_radius,
            tick,
        };
        self.last_report = self.registry.tick(&mut ctx);

        // 2. Drone
        if let Some(drone) = self.drone.as_mut() {
            systems::drone::run(
                drone,
                &self.ship,
                &mut self.registry,
                &mut self.cargo,
                &mut self.progression,
                tick,
            );
        }

        // 3. Autopilot
        let steering = systems::navigation::run(
            &mut self.navigation,
            &self.ship,
            self.drone.as_ref(),
            &self.registry,
            &mut self.cargo,
            &mut self.depot,
            &mut self.cooldowns.depot_full,
            &self.config,
            &mut self.rng,
            &mut self.events,
            tick,
        );

        // 4. Kinematics and jump drive. Autopilot steering overrides manual
        // flight; held input still cancels a charging jump.
        systems::movement::run(
            &mut self.ship,
            steering.as_ref(),
            &self.input,
            &self.config.bounds(),
            &mut self.events,
        );
    }
}
