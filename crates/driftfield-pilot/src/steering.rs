//! Proportional heading control toward a point.
//!
//! Each tick a fixed fraction of the heading error is corrected. Thrust is
//! only applied once the nose is within tolerance; otherwise the ship brakes
//! while it turns so it does not orbit the target.

use driftfield_core::constants::{AUTOPILOT_TURN_GAIN, HEADING_TOLERANCE};
use driftfield_core::types::{normalize_angle, Position};

/// Longitudinal control output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throttle {
    Accelerate,
    Brake,
}

/// Output of one steering step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringCommand {
    /// New heading (radians, normalized).
    pub heading: f64,
    pub throttle: Throttle,
    /// Signed error before correction.
    pub heading_error: f64,
}

/// Controller tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringGains {
    /// Fraction of the error corrected per tick, in (0, 1].
    pub turn_gain: f64,
    /// Error below which thrust is applied (radians).
    pub tolerance: f64,
}

impl Default for SteeringGains {
    fn default() -> Self {
        Self {
            turn_gain: AUTOPILOT_TURN_GAIN,
            tolerance: HEADING_TOLERANCE,
        }
    }
}

/// Signed shortest rotation from `from` to `to`, in `[-PI, PI)`.
pub fn shortest_angle(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

/// Turn toward `target` and decide whether to thrust.
pub fn steer_toward(
    heading: f64,
    from: &Position,
    target: &Position,
    gains: SteeringGains,
) -> SteeringCommand {
    let bearing = from.bearing_to(target);
    let error = shortest_angle(heading, bearing);
    let new_heading = normalize_angle(heading + error * gains.turn_gain);
    let throttle = if error.abs() < gains.tolerance {
        Throttle::Accelerate
    } else {
        Throttle::Brake
    };
    SteeringCommand {
        heading: new_heading,
        throttle,
        heading_error: error,
    }
}

/// Keep the current heading and bleed off speed.
pub fn hold(heading: f64) -> SteeringCommand {
    SteeringCommand {
        heading,
        throttle: Throttle::Brake,
        heading_error: 0.0,
    }
}
