//! Long-jump finite state machine: Idle → Charging → Traveling → Idle.
//!
//! Pure functions that compute phase transitions for the ship's jump drive.
//! The caller owns the ship and applies the returned update.

use glam::DVec2;
use thiserror::Error;

use driftfield_core::constants::*;
use driftfield_core::enums::{ChargeStage, JumpPhaseKind};
use driftfield_core::types::{Position, Velocity, WorldBounds};

/// Current jump phase.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum JumpPhase {
    #[default]
    Idle,
    Charging {
        remaining_ticks: u32,
        stage: ChargeStage,
    },
    Traveling {
        destination: Position,
    },
}

impl JumpPhase {
    pub fn kind(&self) -> JumpPhaseKind {
        match self {
            JumpPhase::Idle => JumpPhaseKind::Idle,
            JumpPhase::Charging { .. } => JumpPhaseKind::Charging,
            JumpPhase::Traveling { .. } => JumpPhaseKind::Traveling,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, JumpPhase::Idle)
    }

    pub fn charge_stage(&self) -> Option<ChargeStage> {
        match self {
            JumpPhase::Charging { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Why a jump could not start or launch.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum JumpRejection {
    #[error("insufficient energy: {energy:.1} < {required:.1}")]
    InsufficientEnergy { energy: f64, required: f64 },
    #[error("destination ({:.0}, {:.0}) is outside the world", destination.x, destination.y)]
    OutOfBounds { destination: Position },
    #[error("jump drive already active")]
    AlreadyActive,
}

/// Why a charge was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    ManualInput,
    EnergyDepleted,
    Requested,
}

/// Notable transitions, for sounds and notifications.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpEvent {
    StageEntered(ChargeStage),
    Launched { destination: Position },
    Cancelled(CancelReason),
    Rejected(JumpRejection),
    Arrived,
}

/// Ship state the jump machine reads each tick.
#[derive(Debug, Clone, Copy)]
pub struct JumpContext {
    pub phase: JumpPhase,
    pub position: Position,
    pub heading: f64,
    pub energy: f64,
    /// Any manual movement input held this tick.
    pub manual_input: bool,
    pub bounds: WorldBounds,
}

/// What the caller applies to the ship.
#[derive(Debug, Clone, Copy)]
pub struct JumpUpdate {
    pub phase: JumpPhase,
    pub energy: f64,
    pub position: Position,
    /// Replaces the ship's velocity when set.
    pub velocity: Option<Velocity>,
    /// Collisions suppressed while true.
    pub ghost: bool,
    pub event: Option<JumpEvent>,
}

/// Where a jump from here would land: heading projected by a distance
/// proportional to the energy held.
pub fn jump_destination(position: &Position, heading: f64, energy: f64) -> Position {
    position.project(heading, energy * JUMP_DISTANCE_PER_ENERGY)
}

/// Stage for `remaining` of `total` countdown ticks.
pub fn charge_stage(remaining: u32, total: u32) -> ChargeStage {
    let fraction = remaining as f64 / total.max(1) as f64;
    if fraction > 2.0 / 3.0 {
        ChargeStage::Spooling
    } else if fraction > 1.0 / 3.0 {
        ChargeStage::Building
    } else {
        ChargeStage::Critical
    }
}

/// Idle → Charging, if energy and the projected destination allow it.
pub fn attempt_jump(
    phase: &JumpPhase,
    position: &Position,
    heading: f64,
    energy: f64,
    bounds: &WorldBounds,
) -> Result<JumpPhase, JumpRejection> {
    if !phase.is_idle() {
        return Err(JumpRejection::AlreadyActive);
    }
    if energy < JUMP_MIN_ENERGY {
        return Err(JumpRejection::InsufficientEnergy {
            energy,
            required: JUMP_MIN_ENERGY,
        });
    }
    let destination = jump_destination(position, heading, energy);
    if !bounds.contains(&destination) {
        return Err(JumpRejection::OutOfBounds { destination });
    }
    Ok(JumpPhase::Charging {
        remaining_ticks: JUMP_CHARGE_TICKS,
        stage: charge_stage(JUMP_CHARGE_TICKS, JUMP_CHARGE_TICKS),
    })
}

/// Advance the jump machine by one tick.
pub fn advance(ctx: &JumpContext) -> JumpUpdate {
    let unchanged = JumpUpdate {
        phase: ctx.phase,
        energy: ctx.energy,
        position: ctx.position,
        velocity: None,
        ghost: false,
        event: None,
    };

    match ctx.phase {
        JumpPhase::Idle => unchanged,
        JumpPhase::Charging {
            remaining_ticks,
            stage,
        } => advance_charging(ctx, remaining_ticks, stage),
        JumpPhase::Traveling { destination } => advance_traveling(ctx, destination),
    }
}

fn advance_charging(ctx: &JumpContext, remaining_ticks: u32, stage: ChargeStage) -> JumpUpdate {
    let cancelled = |energy: f64, reason: CancelReason| JumpUpdate {
        phase: JumpPhase::Idle,
        energy,
        position: ctx.position,
        velocity: None,
        ghost: false,
        event: Some(JumpEvent::Cancelled(reason)),
    };

    if ctx.manual_input {
        return cancelled(ctx.energy, CancelReason::ManualInput);
    }

    let energy = (ctx.energy - JUMP_CHARGE_DRAIN).max(0.0);
    if energy <= 0.0 {
        return cancelled(0.0, CancelReason::EnergyDepleted);
    }

    let remaining = remaining_ticks.saturating_sub(1);
    if remaining == 0 {
        // Launch from the final heading and energy.
        let destination = jump_destination(&ctx.position, ctx.heading, energy);
        if !ctx.bounds.contains(&destination) {
            return JumpUpdate {
                phase: JumpPhase::Idle,
                energy,
                position: ctx.position,
                velocity: None,
                ghost: false,
                event: Some(JumpEvent::Rejected(JumpRejection::OutOfBounds { destination })),
            };
        }
        return JumpUpdate {
            phase: JumpPhase::Traveling { destination },
            energy: 0.0,
            position: ctx.position,
            velocity: Some(travel_velocity(&ctx.position, &destination)),
            ghost: true,
            event: Some(JumpEvent::Launched { destination }),
        };
    }

    let new_stage = charge_stage(remaining, JUMP_CHARGE_TICKS);
    JumpUpdate {
        phase: JumpPhase::Charging {
            remaining_ticks: remaining,
            stage: new_stage,
        },
        energy,
        position: ctx.position,
        velocity: None,
        ghost: false,
        event: (new_stage != stage).then_some(JumpEvent::StageEntered(new_stage)),
    }
}

fn advance_traveling(ctx: &JumpContext, destination: Position) -> JumpUpdate {
    let step = JUMP_SPEED * DT;
    let to_dest = DVec2::from(destination) - DVec2::from(ctx.position);

    if to_dest.length() <= step {
        return JumpUpdate {
            phase: JumpPhase::Idle,
            energy: ctx.energy,
            position: destination,
            velocity: Some(Velocity::default()),
            ghost: false,
            event: Some(JumpEvent::Arrived),
        };
    }

    let next = DVec2::from(ctx.position) + to_dest.normalize() * step;
    JumpUpdate {
        phase: ctx.phase,
        energy: ctx.energy,
        position: next.into(),
        velocity: Some(travel_velocity(&ctx.position, &destination)),
        ghost: true,
        event: None,
    }
}

fn travel_velocity(from: &Position, to: &Position) -> Velocity {
    let v = (DVec2::from(*to) - DVec2::from(*from)).normalize_or_zero() * JUMP_SPEED;
    Velocity::new(v.x, v.y)
}
