//! Navigation system: runs the autopilot and carries out its side effects.
//!
//! Calls the navigation state machine from driftfield-pilot with candidates
//! pulled from the registry, then performs depot transfers and
//! disengagement notices. Skipped while the jump drive is busy.

use hecs::Entity;
use rand_chacha::ChaCha8Rng;

use driftfield_core::config::WorldConfig;
use driftfield_core::enums::{AutopilotMode, ColorTag, SoundEffect};
use driftfield_core::events::SimEvent;

use driftfield_pilot::autopilot::{NavigationState, PilotAction, PilotContext};
use driftfield_pilot::steering::SteeringCommand;

use crate::context::Cooldown;
use crate::drone::Drone;
use crate::registry::EntityRegistry;
use crate::ship::Ship;
use crate::sinks::{CargoHold, Depot, InventorySink};

/// Run one autopilot tick. Returns the steering to apply, if any.
#[allow(clippy::too_many_arguments)]
pub fn run(
    nav: &mut NavigationState<Entity>,
    ship: &Ship,
    drone: Option<&Drone>,
    registry: &EntityRegistry,
    cargo: &mut CargoHold,
    depot: &mut Depot,
    depot_notice: &mut Cooldown,
    config: &WorldConfig,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<SimEvent>,
    current_tick: u64,
) -> Option<SteeringCommand> {
    if !nav.enabled || !ship.jump.is_idle() {
        return None;
    }

    let observer = ship.observer(config.scan_radius, config.radar_radius);
    let candidates = if nav.wants_candidates() {
        registry.candidates(&observer.position, observer.radar_radius)
    } else {
        Vec::new()
    };

    let mode_before = nav.mode;
    let ctx = PilotContext {
        observer,
        inventory_full: cargo.is_full(),
        home_base: config.home_base,
        depot: config.depot,
        bounds: config.bounds(),
        drone: drone.map(|d| d.status(current_tick)),
        candidates: &candidates,
    };
    let decision = nav.decide(&ctx, rng);

    if mode_before != AutopilotMode::Deposit && nav.mode == AutopilotMode::Deposit {
        events.push(SimEvent::notify(
            "Cargo hold full",
            ColorTag::Info,
            "Autopilot returning to depot",
        ));
    }

    match decision.action {
        Some(PilotAction::DepositCargo) => {
            deposit(cargo, depot, depot_notice, events, current_tick);
            if !nav.finish_deposit(cargo.is_full()) {
                events.push(SimEvent::notify(
                    "Autopilot halted",
                    ColorTag::Warning,
                    "Depot cannot take more cargo",
                ));
            }
        }
        Some(PilotAction::Disengaged) => {
            events.push(SimEvent::notify(
                "Destination reached",
                ColorTag::Success,
                "Autopilot disengaged",
            ));
        }
        None => {}
    }

    decision.steering
}

/// Move the hold into depot storage, stopping when the depot refuses.
/// The "depot full" notice is throttled by `notice`.
pub fn deposit(
    cargo: &mut CargoHold,
    depot: &mut Depot,
    notice: &mut Cooldown,
    events: &mut Vec<SimEvent>,
    current_tick: u64,
) -> usize {
    let moved = cargo.transfer_into(depot);
    let left = cargo.current_count();
    log::debug!("deposited {moved} item(s), {left} left in hold");

    if left > 0 {
        if notice.try_fire(current_tick) {
            events.push(SimEvent::notify(
                "Depot full",
                ColorTag::Warning,
                format!("Stored {moved}, {left} still aboard"),
            ));
            events.push(SimEvent::sound(SoundEffect::Denied));
        }
    } else if moved > 0 {
        events.push(SimEvent::notify(
            "Cargo deposited",
            ColorTag::Success,
            format!("{moved} item(s) stored"),
        ));
        events.push(SimEvent::sound(SoundEffect::Deposit));
    }
    moved
}
