//! The player ship: kinematic state, vitals and jump drive.

use driftfield_core::constants::*;
use driftfield_core::state::ShipView;
use driftfield_core::types::{normalize_angle, Observer, Position, Velocity, WorldBounds};
use driftfield_pilot::jump::{JumpPhase, JumpUpdate};
use driftfield_pilot::steering::{SteeringCommand, Throttle};

/// Held manual flight input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipInput {
    /// Turn demand in [-1, 1]; positive is counter-clockwise.
    pub turn: f64,
    pub thrust: bool,
    pub brake: bool,
}

impl ShipInput {
    pub fn is_active(&self) -> bool {
        self.turn != 0.0 || self.thrust || self.brake
    }
}

/// Arcade flight model: the ship always moves along its nose at `speed`.
#[derive(Debug, Clone)]
pub struct Ship {
    pub position: Position,
    /// Radians, normalized to [-PI, PI).
    pub heading: f64,
    pub speed: f64,
    pub energy: f64,
    pub hull: f64,
    pub collision_radius: f64,
    /// Collisions suppressed while set (long-jump travel).
    pub ghost: bool,
    pub god_mode: bool,
    pub jump: JumpPhase,
}

impl Ship {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            heading: 0.0,
            speed: 0.0,
            energy: SHIP_MAX_ENERGY,
            hull: SHIP_MAX_HULL,
            collision_radius: SHIP_COLLISION_RADIUS,
            ghost: false,
            god_mode: false,
            jump: JumpPhase::Idle,
        }
    }

    pub fn velocity(&self) -> Velocity {
        Velocity::from_heading(self.heading, self.speed)
    }

    pub fn observer(&self, scan_radius: f64, radar_radius: f64) -> Observer {
        Observer {
            position: self.position,
            heading: self.heading,
            scan_radius,
            radar_radius,
        }
    }

    pub fn apply_damage(&mut self, amount: f64) {
        self.hull = (self.hull - amount).max(0.0);
    }

    pub fn restore_energy(&mut self, amount: f64) {
        self.energy = (self.energy + amount).min(SHIP_MAX_ENERGY);
    }

    /// Copy a jump-machine result onto the ship.
    pub fn apply_jump(&mut self, update: &JumpUpdate) {
        self.jump = update.phase;
        self.energy = update.energy;
        self.position = update.position;
        self.ghost = update.ghost;
        if let Some(v) = update.velocity {
            self.speed = v.speed();
        }
    }

    /// One tick of normal flight. Autopilot steering, when present, replaces
    /// the manual turn and throttle.
    pub fn integrate(
        &mut self,
        steering: Option<&SteeringCommand>,
        input: &ShipInput,
        bounds: &WorldBounds,
    ) {
        let throttle = match steering {
            Some(cmd) => {
                self.heading = cmd.heading;
                Some(cmd.throttle)
            }
            None => {
                let turn = input.turn.clamp(-1.0, 1.0);
                self.heading = normalize_angle(self.heading + turn * SHIP_TURN_RATE * DT);
                if input.brake {
                    Some(Throttle::Brake)
                } else if input.thrust {
                    Some(Throttle::Accelerate)
                } else {
                    None
                }
            }
        };

        self.speed = match throttle {
            Some(Throttle::Accelerate) => (self.speed + SHIP_ACCEL * DT).min(SHIP_MAX_SPEED),
            Some(Throttle::Brake) => (self.speed - SHIP_BRAKE_DECEL * DT).max(0.0),
            None => self.speed * (1.0 - SHIP_DRAG),
        };

        let v = self.velocity();
        let next = Position::new(self.position.x + v.x * DT, self.position.y + v.y * DT);
        self.position = bounds.clamp(next);
    }

    pub fn view(&self) -> ShipView {
        ShipView {
            position: self.position,
            heading: self.heading,
            speed: self.speed,
            energy: self.energy,
            hull: self.hull,
            ghost: self.ghost,
            jump_phase: self.jump.kind(),
            charge_stage: self.jump.charge_stage(),
        }
    }
}
