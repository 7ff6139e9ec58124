//! Ship kinematics and jump-drive system.
//!
//! Advances the jump state machine first; normal flight only integrates while
//! the drive is idle (or coasts while it charges).

use driftfield_core::enums::{ChargeStage, ColorTag, SoundEffect};
use driftfield_core::events::SimEvent;
use driftfield_core::types::WorldBounds;

use driftfield_pilot::jump::{self, CancelReason, JumpContext, JumpEvent, JumpPhase};
use driftfield_pilot::steering::SteeringCommand;

use crate::ship::{Ship, ShipInput};

/// Run one tick of ship motion.
pub fn run(
    ship: &mut Ship,
    steering: Option<&SteeringCommand>,
    input: &ShipInput,
    bounds: &WorldBounds,
    events: &mut Vec<SimEvent>,
) {
    let was_idle = ship.jump.is_idle();

    if !was_idle {
        let update = jump::advance(&JumpContext {
            phase: ship.jump,
            position: ship.position,
            heading: ship.heading,
            energy: ship.energy,
            manual_input: input.is_active(),
            bounds: *bounds,
        });
        ship.apply_jump(&update);
        if let Some(event) = update.event {
            report_jump_event(&event, events);
        }
    }

    match ship.jump {
        JumpPhase::Idle if was_idle => ship.integrate(steering, input, bounds),
        JumpPhase::Charging { .. } => ship.integrate(None, &ShipInput::default(), bounds),
        _ => {}
    }
}

/// Translate a jump transition into sounds and notifications.
pub fn report_jump_event(event: &JumpEvent, events: &mut Vec<SimEvent>) {
    match event {
        JumpEvent::StageEntered(stage) => {
            log::debug!("jump charge stage {stage:?}");
            let effect = match stage {
                ChargeStage::Spooling => SoundEffect::JumpSpool,
                ChargeStage::Building => SoundEffect::JumpBuild,
                ChargeStage::Critical => SoundEffect::JumpCritical,
            };
            events.push(SimEvent::sound(effect));
        }
        JumpEvent::Launched { destination } => {
            log::debug!("jump launched toward ({:.0}, {:.0})", destination.x, destination.y);
            events.push(SimEvent::sound(SoundEffect::JumpLaunch));
        }
        JumpEvent::Cancelled(reason) => {
            log::debug!("jump cancelled: {reason:?}");
            let detail = match reason {
                CancelReason::ManualInput => "Manual input interrupted the charge",
                CancelReason::EnergyDepleted => "Energy depleted",
                CancelReason::Requested => "Charge aborted",
            };
            events.push(SimEvent::notify("Jump cancelled", ColorTag::Warning, detail));
            events.push(SimEvent::sound(SoundEffect::JumpCancelled));
        }
        JumpEvent::Rejected(rejection) => {
            log::debug!("jump rejected: {rejection}");
            events.push(SimEvent::notify(
                "Jump unavailable",
                ColorTag::Danger,
                rejection.to_string(),
            ));
            events.push(SimEvent::sound(SoundEffect::Denied));
        }
        JumpEvent::Arrived => {
            log::debug!("jump complete");
            events.push(SimEvent::notify("Jump complete", ColorTag::Info, ""));
            events.push(SimEvent::sound(SoundEffect::JumpArrive));
        }
    }
}
