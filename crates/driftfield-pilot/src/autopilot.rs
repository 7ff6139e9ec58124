//! Autopilot navigation state machine.
//!
//! Decides where the ship should go each tick (gather target, base, depot,
//! manual point or scout point) and produces a steering command toward it.
//! No ECS dependency; entities are referenced by an opaque id.

use rand::Rng;

use driftfield_core::constants::{ARRIVAL_RADIUS, SCOUT_MARGIN};
use driftfield_core::enums::AutopilotMode;
use driftfield_core::types::{DroneStatus, Observer, Position, WorldBounds};

use crate::steering::{hold, steer_toward, SteeringCommand, SteeringGains};
use crate::targeting::{select_gather_target, Candidate};

/// Where the autopilot decided to go this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavTarget<Id> {
    Entity { id: Id, position: Position },
    Base(Position),
    Depot(Position),
    Manual(Position),
    Scout(Position),
}

impl<Id> NavTarget<Id> {
    pub fn position(&self) -> Position {
        match self {
            NavTarget::Entity { position, .. } => *position,
            NavTarget::Base(p) | NavTarget::Depot(p) | NavTarget::Manual(p) | NavTarget::Scout(p) => *p,
        }
    }
}

/// Side effects the caller must carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PilotAction {
    /// Arrived at the depot: move cargo into storage.
    DepositCargo,
    /// Arrived at the manual target; the autopilot switched itself off.
    Disengaged,
}

/// Result of one autopilot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PilotDecision<Id> {
    pub target: Option<NavTarget<Id>>,
    pub steering: Option<SteeringCommand>,
    pub action: Option<PilotAction>,
}

impl<Id> PilotDecision<Id> {
    fn idle() -> Self {
        Self {
            target: None,
            steering: None,
            action: None,
        }
    }
}

/// Everything the autopilot reads for one decision.
pub struct PilotContext<'a, Id> {
    pub observer: Observer,
    pub inventory_full: bool,
    pub home_base: Position,
    pub depot: Position,
    pub bounds: WorldBounds,
    pub drone: Option<DroneStatus>,
    /// Index query result around the observer; only read in `Gather`.
    pub candidates: &'a [Candidate<Id>],
}

/// Persistent autopilot state.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState<Id> {
    pub enabled: bool,
    pub mode: AutopilotMode,
    pub manual_target: Option<Position>,
    pub scout_point: Option<Position>,
    /// Telemetry for debug overlays; never read by the decision logic.
    pub last_target: Option<NavTarget<Id>>,
    pub gains: SteeringGains,
}

impl<Id> Default for NavigationState<Id> {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: AutopilotMode::Unset,
            manual_target: None,
            scout_point: None,
            last_target: None,
            gains: SteeringGains::default(),
        }
    }
}

impl<Id: Copy> NavigationState<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch on in `mode`.
    pub fn engage(&mut self, mode: AutopilotMode) {
        if !self.enabled || self.mode != mode {
            log::debug!("autopilot engaged: {:?} -> {:?}", self.mode, mode);
        }
        self.enabled = true;
        self.mode = mode;
    }

    /// Switch off, discarding the manual target and scout point.
    pub fn disengage(&mut self) {
        if self.enabled {
            log::debug!("autopilot disengaged from {:?}", self.mode);
        }
        self.enabled = false;
        self.mode = AutopilotMode::Unset;
        self.manual_target = None;
        self.scout_point = None;
    }

    /// Toggle on (gather) / off. Returns the new enabled state.
    pub fn toggle(&mut self) -> bool {
        if self.enabled {
            self.disengage();
        } else {
            self.engage(AutopilotMode::Gather);
        }
        self.enabled
    }

    /// Manual override of the mode. `Travel` needs a manual target and is
    /// ignored without one; `Unset` disengages.
    pub fn force_mode(&mut self, mode: AutopilotMode) {
        match mode {
            AutopilotMode::Unset => self.disengage(),
            AutopilotMode::Travel if self.manual_target.is_none() => {}
            _ => self.engage(mode),
        }
    }

    /// Select a manual destination. Returns false (no change) when the point
    /// lies outside the world.
    pub fn set_manual_target(&mut self, point: Position, bounds: &WorldBounds) -> bool {
        if !bounds.contains(&point) {
            return false;
        }
        self.manual_target = Some(point);
        self.engage(AutopilotMode::Travel);
        true
    }

    /// Full hold while gathering: head for the depot. Other modes keep
    /// running until their own arrival condition fires.
    /// Returns true if the mode changed.
    pub fn check_capacity(&mut self, inventory_full: bool) -> bool {
        if self.enabled
            && inventory_full
            && matches!(self.mode, AutopilotMode::Gather | AutopilotMode::Unset)
        {
            log::debug!("cargo hold full, switching to deposit");
            self.mode = AutopilotMode::Deposit;
            return true;
        }
        false
    }

    /// Report the outcome of a depot transfer. Gathering resumes once the
    /// hold has room; a hold the depot could not take switches the autopilot
    /// off instead of cycling between Gather and Deposit.
    /// Returns true if the autopilot is still engaged.
    pub fn finish_deposit(&mut self, hold_full: bool) -> bool {
        if !self.enabled || self.mode != AutopilotMode::Deposit {
            return self.enabled;
        }
        if hold_full {
            log::debug!("depot refused cargo, autopilot stopping");
            self.disengage();
        } else {
            log::debug!("cargo deposited, resuming gather");
            self.mode = AutopilotMode::Gather;
        }
        self.enabled
    }

    /// Whether the next `decide` will read the candidate list.
    pub fn wants_candidates(&self) -> bool {
        self.enabled && self.mode == AutopilotMode::Gather
    }

    /// One autopilot tick: capacity check, target selection, steering.
    pub fn decide<R: Rng>(&mut self, ctx: &PilotContext<'_, Id>, rng: &mut R) -> PilotDecision<Id> {
        if !self.enabled {
            return PilotDecision::idle();
        }
        self.check_capacity(ctx.inventory_full);

        let pos = ctx.observer.position;
        let heading = ctx.observer.heading;

        let decision = match self.mode {
            AutopilotMode::Unset => PilotDecision::idle(),
            AutopilotMode::Base => {
                let target = NavTarget::Base(ctx.home_base);
                let steering = if pos.distance_to(&ctx.home_base) <= ARRIVAL_RADIUS {
                    hold(heading)
                } else {
                    steer_toward(heading, &pos, &ctx.home_base, self.gains)
                };
                PilotDecision {
                    target: Some(target),
                    steering: Some(steering),
                    action: None,
                }
            }
            AutopilotMode::Deposit => {
                let target = NavTarget::Depot(ctx.depot);
                if pos.distance_to(&ctx.depot) <= ARRIVAL_RADIUS {
                    // Mode stays Deposit until `finish_deposit` reports the transfer.
                    log::debug!("arrived at depot");
                    PilotDecision {
                        target: Some(target),
                        steering: Some(hold(heading)),
                        action: Some(PilotAction::DepositCargo),
                    }
                } else {
                    PilotDecision {
                        target: Some(target),
                        steering: Some(steer_toward(heading, &pos, &ctx.depot, self.gains)),
                        action: None,
                    }
                }
            }
            AutopilotMode::Travel => match self.manual_target {
                Some(point) if pos.distance_to(&point) <= ARRIVAL_RADIUS => {
                    self.disengage();
                    PilotDecision {
                        target: Some(NavTarget::Manual(point)),
                        steering: Some(hold(heading)),
                        action: Some(PilotAction::Disengaged),
                    }
                }
                Some(point) => PilotDecision {
                    target: Some(NavTarget::Manual(point)),
                    steering: Some(steer_toward(heading, &pos, &point, self.gains)),
                    action: None,
                },
                None => {
                    self.disengage();
                    PilotDecision {
                        target: None,
                        steering: None,
                        action: Some(PilotAction::Disengaged),
                    }
                }
            },
            AutopilotMode::Gather => {
                let target = match select_gather_target(
                    &pos,
                    ctx.observer.radar_radius,
                    ctx.candidates,
                    ctx.drone.as_ref(),
                ) {
                    Some(c) => NavTarget::Entity {
                        id: c.id,
                        position: c.position,
                    },
                    None => NavTarget::Scout(self.scout_point_for(&pos, &ctx.bounds, rng)),
                };
                log::trace!("gather target {:?}", target.position());
                PilotDecision {
                    target: Some(target),
                    steering: Some(steer_toward(heading, &pos, &target.position(), self.gains)),
                    action: None,
                }
            }
        };

        self.last_target = decision.target;
        decision
    }

    /// Cached scout point, redrawn once reached (or if none is cached).
    fn scout_point_for<R: Rng>(&mut self, pos: &Position, bounds: &WorldBounds, rng: &mut R) -> Position {
        match self.scout_point {
            Some(p) if pos.distance_to(&p) > ARRIVAL_RADIUS => p,
            _ => {
                let p = random_scout_point(bounds, rng);
                log::trace!("new scout point ({:.0}, {:.0})", p.x, p.y);
                self.scout_point = Some(p);
                p
            }
        }
    }
}

/// Uniform point at least `SCOUT_MARGIN` inside the world edge (less for
/// worlds too small to honor the full margin).
pub fn random_scout_point<R: Rng>(bounds: &WorldBounds, rng: &mut R) -> Position {
    let mx = SCOUT_MARGIN.min(bounds.width / 2.0);
    let my = SCOUT_MARGIN.min(bounds.height / 2.0);
    Position::new(
        rng.gen_range(mx..=bounds.width - mx),
        rng.gen_range(my..=bounds.height - my),
    )
}
