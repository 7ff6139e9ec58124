//! Simulation constants and tuning parameters.
//!
//! These are the authoritative defaults; `WorldConfig::default()` mirrors the
//! world-level ones and a TOML file may override them at startup.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- World ---

/// World width in world units.
pub const WORLD_WIDTH: f64 = 20_000.0;

/// World height in world units.
pub const WORLD_HEIGHT: f64 = 20_000.0;

/// No entity spawns within this distance of home base.
pub const PROTECTED_RADIUS: f64 = 900.0;

/// Respawned entities keep at least this distance from the observer.
/// Larger than the default radar radius so replacements never pop in on screen.
pub const SPAWN_CLEARANCE: f64 = 1_400.0;

/// Live population held by the registry.
pub const TARGET_POPULATION: usize = 1_200;

/// Rejection-sampling attempts per spawned entity before giving up for the frame.
pub const MAX_SPAWN_ATTEMPTS: u32 = 32;

// --- Spatial index ---

/// Grid cell edge length. Close to the largest routine query radius so a
/// query touches 4–9 cells.
pub const CELL_SIZE: f64 = 600.0;

/// Upper bound on cells per axis covered by one radar query; configs with a
/// cell size this small relative to radar range are rejected.
pub const MAX_QUERY_CELLS_ACROSS: f64 = 64.0;

// --- Entity radii ---

pub const ORDINARY_RADIUS: f64 = 18.0;
pub const RARE_TIER1_RADIUS: f64 = 20.0;
pub const RARE_TIER2_RADIUS: f64 = 22.0;
pub const RARE_TIER3_RADIUS: f64 = 26.0;
pub const HAZARD_CLOUD_RADIUS: f64 = 160.0;
pub const ORGANISM_RADIUS: f64 = 16.0;
pub const CARGO_RADIUS: f64 = 20.0;

/// Largest radius of any category. Pads the collision query so large
/// entities centered just outside scan range are still found.
pub const MAX_ENTITY_RADIUS: f64 = HAZARD_CLOUD_RADIUS;

// --- Spawn weights (relative) ---

pub const WEIGHT_ORDINARY: u32 = 800;
pub const WEIGHT_RARE_TIER1: u32 = 80;
pub const WEIGHT_RARE_TIER2: u32 = 40;
pub const WEIGHT_RARE_TIER3: u32 = 20;
pub const WEIGHT_HAZARD_CLOUD: u32 = 30;
pub const WEIGHT_ORGANISM: u32 = 20;
pub const WEIGHT_CARGO: u32 = 10;

/// Maximum payload items inside a recovered cargo container.
pub const CARGO_MAX_PAYLOAD: u32 = 3;

// --- Loot ---

/// Default loot-count distribution as (copies, weight).
pub const LOOT_TABLE: [(u32, u32); 5] = [(0, 20), (1, 45), (2, 25), (3, 7), (4, 3)];

// --- Experience ---

pub const XP_ORDINARY: u32 = 1;
pub const XP_RARE_TIER1: u32 = 3;
pub const XP_RARE_TIER2: u32 = 6;
pub const XP_RARE_TIER3: u32 = 10;
pub const XP_CARGO: u32 = 5;

// --- Recovery organism ---

/// Energy restored by a recovery organism.
pub const ORGANISM_ENERGY: f64 = 20.0;

/// Experience granted by a recovery organism.
pub const ORGANISM_XP: u32 = 15;

// --- Hazard ---

/// Hull damage per application.
pub const HAZARD_DAMAGE: f64 = 2.0;

/// Ticks between damage applications (~1 s).
pub const HAZARD_DAMAGE_COOLDOWN_TICKS: u64 = 30;

/// Ticks between hazard warnings (~5 s).
pub const HAZARD_NOTIFY_COOLDOWN_TICKS: u64 = 150;

/// Ticks between "cargo hold full" notifications (~4 s).
pub const CARGO_FULL_NOTIFY_COOLDOWN_TICKS: u64 = 120;

/// Ticks between "depot full" notifications (~5 s).
pub const DEPOT_FULL_NOTIFY_COOLDOWN_TICKS: u64 = 150;

// --- Ship ---

/// Ship collision radius.
pub const SHIP_COLLISION_RADIUS: f64 = 14.0;

/// Full-detail scan radius.
pub const SHIP_SCAN_RADIUS: f64 = 500.0;

/// Signal-only radar radius.
pub const SHIP_RADAR_RADIUS: f64 = 1_200.0;

/// Maximum cruise speed (units/s).
pub const SHIP_MAX_SPEED: f64 = 240.0;

/// Forward acceleration (units/s²).
pub const SHIP_ACCEL: f64 = 360.0;

/// Braking deceleration (units/s²).
pub const SHIP_BRAKE_DECEL: f64 = 480.0;

/// Fraction of speed lost per tick while coasting.
pub const SHIP_DRAG: f64 = 0.005;

/// Manual turn rate at full stick (rad/s).
pub const SHIP_TURN_RATE: f64 = 3.0;

pub const SHIP_MAX_HULL: f64 = 100.0;
pub const SHIP_MAX_ENERGY: f64 = 100.0;

/// Cargo hold capacity (items).
pub const CARGO_CAPACITY: usize = 40;

/// Depot capacity (items).
pub const DEPOT_CAPACITY: usize = 2_000;

/// Depot offset from home base, inside the protected zone.
pub const DEPOT_OFFSET_X: f64 = 300.0;
pub const DEPOT_OFFSET_Y: f64 = 0.0;

// --- Autopilot ---

/// Fraction of the heading error corrected each tick.
pub const AUTOPILOT_TURN_GAIN: f64 = 0.18;

/// Heading error below which the autopilot applies thrust (radians).
pub const HEADING_TOLERANCE: f64 = 0.35;

/// Distance at which a fixed destination counts as reached.
pub const ARRIVAL_RADIUS: f64 = 40.0;

/// Scout points are drawn at least this far inside the world edge.
pub const SCOUT_MARGIN: f64 = 1_000.0;

// --- Long jump ---

/// Minimum energy required to begin charging.
pub const JUMP_MIN_ENERGY: f64 = 25.0;

/// Jump distance per unit of energy held.
pub const JUMP_DISTANCE_PER_ENERGY: f64 = 60.0;

/// Charge countdown (ticks, 3 s).
pub const JUMP_CHARGE_TICKS: u32 = 90;

/// Energy drained per charging tick.
pub const JUMP_CHARGE_DRAIN: f64 = 0.1;

/// Travel speed while jumping (units/s).
pub const JUMP_SPEED: f64 = 3_000.0;

// --- Drone ---

pub const DRONE_RADAR_RADIUS: f64 = 600.0;
pub const DRONE_MAX_SPEED: f64 = 200.0;
pub const DRONE_CAPACITY: usize = 8;

/// Distance at which the drone picks up an entity or docks with the ship.
pub const DRONE_REACH: f64 = 24.0;

/// Escort trailing distance behind the ship.
pub const DRONE_ESCORT_DISTANCE: f64 = 60.0;

/// Ticks the drone stays inert after hazard disruption (~6 s).
pub const DRONE_DISRUPT_TICKS: u32 = 180;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;
