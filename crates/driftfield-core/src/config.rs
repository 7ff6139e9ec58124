//! Runtime world configuration.
//!
//! [`WorldConfig`] mirrors the world-level constants in [`crate::constants`].
//! A TOML file may override any subset of keys; missing keys fall back to the
//! compiled defaults. The simulation treats the config as read-only after
//! construction.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::Category;
use crate::error::{ConfigError, ConfigResult};
use crate::types::{Position, WorldBounds};

/// One row of the loot-count distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootEntry {
    pub copies: u32,
    pub weight: u32,
}

/// Weighted distribution of how many copies an ore-like pickup yields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LootTable {
    pub entries: Vec<LootEntry>,
}

impl Default for LootTable {
    fn default() -> Self {
        Self {
            entries: LOOT_TABLE
                .iter()
                .map(|&(copies, weight)| LootEntry { copies, weight })
                .collect(),
        }
    }
}

impl LootTable {
    /// A table that always yields `copies`.
    pub fn fixed(copies: u32) -> Self {
        Self {
            entries: vec![LootEntry { copies, weight: 1 }],
        }
    }

    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Map a roll in `[0, total_weight)` to a copy count.
    pub fn copies_for(&self, roll: u32) -> u32 {
        let mut remaining = roll;
        for entry in &self.entries {
            if remaining < entry.weight {
                return entry.copies;
            }
            remaining -= entry.weight;
        }
        self.entries.last().map_or(0, |e| e.copies)
    }
}

/// Relative spawn frequency per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    pub ordinary: u32,
    pub rare_tier1: u32,
    pub rare_tier2: u32,
    pub rare_tier3: u32,
    pub hazard_cloud: u32,
    pub recovery_organism: u32,
    pub recovery_cargo: u32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            ordinary: WEIGHT_ORDINARY,
            rare_tier1: WEIGHT_RARE_TIER1,
            rare_tier2: WEIGHT_RARE_TIER2,
            rare_tier3: WEIGHT_RARE_TIER3,
            hazard_cloud: WEIGHT_HAZARD_CLOUD,
            recovery_organism: WEIGHT_ORGANISM,
            recovery_cargo: WEIGHT_CARGO,
        }
    }
}

impl SpawnWeights {
    /// Weight of a single category.
    pub fn weight(&self, category: Category) -> u32 {
        match category {
            Category::Ordinary => self.ordinary,
            Category::RareTier1 => self.rare_tier1,
            Category::RareTier2 => self.rare_tier2,
            Category::RareTier3 => self.rare_tier3,
            Category::HazardCloud => self.hazard_cloud,
            Category::RecoveryOrganism => self.recovery_organism,
            Category::RecoveryCargo => self.recovery_cargo,
        }
    }

    pub fn total_weight(&self) -> u32 {
        Category::ALL.iter().map(|&c| self.weight(c)).sum()
    }

    /// Map a roll in `[0, total_weight)` to a category.
    pub fn category_for(&self, roll: u32) -> Category {
        let mut remaining = roll;
        for category in Category::ALL {
            let w = self.weight(category);
            if remaining < w {
                return category;
            }
            remaining -= w;
        }
        Category::Ordinary
    }
}

/// World-level configuration injected at engine construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// RNG seed. Same seed + same commands = same simulation.
    pub seed: u64,

    // ── World ───────────────────────────────────────────────────────────
    pub world_width: f64,
    pub world_height: f64,
    pub home_base: Position,
    pub depot: Position,
    pub protected_radius: f64,
    pub spawn_clearance: f64,
    pub target_population: usize,

    // ── Spatial index ───────────────────────────────────────────────────
    pub cell_size: f64,

    // ── Observer ────────────────────────────────────────────────────────
    pub scan_radius: f64,
    pub radar_radius: f64,

    // ── Storage ─────────────────────────────────────────────────────────
    pub cargo_capacity: usize,
    pub depot_capacity: usize,

    // ── Tables ──────────────────────────────────────────────────────────
    pub loot_table: LootTable,
    pub spawn_weights: SpawnWeights,

    // ── Drone ───────────────────────────────────────────────────────────
    /// Whether the ship owns a secondary drone.
    pub drone_enabled: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        let home_base = Position::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
        Self {
            seed: DEFAULT_SEED,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            home_base,
            depot: Position::new(home_base.x + DEPOT_OFFSET_X, home_base.y + DEPOT_OFFSET_Y),
            protected_radius: PROTECTED_RADIUS,
            spawn_clearance: SPAWN_CLEARANCE,
            target_population: TARGET_POPULATION,
            cell_size: CELL_SIZE,
            scan_radius: SHIP_SCAN_RADIUS,
            radar_radius: SHIP_RADAR_RADIUS,
            cargo_capacity: CARGO_CAPACITY,
            depot_capacity: DEPOT_CAPACITY,
            loot_table: LootTable::default(),
            spawn_weights: SpawnWeights::default(),
            drone_enabled: false,
        }
    }
}

impl WorldConfig {
    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.world_width, self.world_height)
    }

    /// Parse a TOML document and validate it.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: WorldConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("loaded world config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(positive(self.world_width) && positive(self.world_height)) {
            return Err(invalid("world_width", "world dimensions must be positive"));
        }
        if !positive(self.cell_size) {
            return Err(invalid("cell_size", "must be positive"));
        }
        if !positive(self.scan_radius) {
            return Err(invalid("scan_radius", "must be positive"));
        }
        if !positive(self.radar_radius) {
            return Err(invalid("radar_radius", "must be positive"));
        }
        let cells_across = 2.0 * (self.radar_radius + MAX_ENTITY_RADIUS) / self.cell_size;
        if cells_across > MAX_QUERY_CELLS_ACROSS {
            return Err(invalid(
                "cell_size",
                format!(
                    "a radar query would span {cells_across:.0} cells per axis (limit {MAX_QUERY_CELLS_ACROSS})"
                ),
            ));
        }
        if self.scan_radius > self.radar_radius {
            return Err(invalid(
                "scan_radius",
                format!(
                    "scan radius {} exceeds radar radius {}",
                    self.scan_radius, self.radar_radius
                ),
            ));
        }
        if !(self.protected_radius >= 0.0 && self.spawn_clearance >= 0.0)
            || !(self.protected_radius.is_finite() && self.spawn_clearance.is_finite())
        {
            return Err(invalid("protected_radius", "radii must be non-negative"));
        }
        let bounds = self.bounds();
        if !bounds.contains(&self.home_base) {
            return Err(invalid("home_base", "must lie inside the world"));
        }
        if !bounds.contains(&self.depot) {
            return Err(invalid("depot", "must lie inside the world"));
        }
        if self.protected_radius * 2.0 >= self.world_width.min(self.world_height) {
            return Err(invalid(
                "protected_radius",
                "protected zone leaves no room to spawn entities",
            ));
        }
        if self.loot_table.total_weight() == 0 {
            return Err(invalid("loot_table", "needs at least one positive weight"));
        }
        if self.spawn_weights.total_weight() == 0 {
            return Err(invalid("spawn_weights", "needs at least one positive weight"));
        }
        Ok(())
    }
}

/// Finite and greater than zero (rejects NaN).
fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
