//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Closed set of world entity categories.
///
/// Adding a category is a compile-time-checked change: every dispatch over
/// categories matches exhaustively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Ordinary,
    RareTier1,
    RareTier2,
    RareTier3,
    HazardCloud,
    RecoveryOrganism,
    RecoveryCargo,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Ordinary,
        Category::RareTier1,
        Category::RareTier2,
        Category::RareTier3,
        Category::HazardCloud,
        Category::RecoveryOrganism,
        Category::RecoveryCargo,
    ];

    /// Collision/query radius. Fixed per category so an entity's extent can
    /// never change between index insertion and removal.
    pub fn radius(self) -> f64 {
        match self {
            Category::Ordinary => ORDINARY_RADIUS,
            Category::RareTier1 => RARE_TIER1_RADIUS,
            Category::RareTier2 => RARE_TIER2_RADIUS,
            Category::RareTier3 => RARE_TIER3_RADIUS,
            Category::HazardCloud => HAZARD_CLOUD_RADIUS,
            Category::RecoveryOrganism => ORGANISM_RADIUS,
            Category::RecoveryCargo => CARGO_RADIUS,
        }
    }

    /// Whether the autopilot may pick this category as a gather target.
    pub fn is_gatherable(self) -> bool {
        !matches!(self, Category::HazardCloud)
    }

    /// Item granted per loot copy for ore-like categories.
    pub fn loot_item(self) -> Option<ItemKind> {
        match self {
            Category::Ordinary => Some(ItemKind::Ore),
            Category::RareTier1 => Some(ItemKind::Crystal),
            Category::RareTier2 => Some(ItemKind::Isotope),
            Category::RareTier3 => Some(ItemKind::Relic),
            Category::HazardCloud | Category::RecoveryOrganism | Category::RecoveryCargo => None,
        }
    }

    /// Experience granted per loot copy.
    pub fn xp_per_copy(self) -> u32 {
        match self {
            Category::Ordinary => XP_ORDINARY,
            Category::RareTier1 => XP_RARE_TIER1,
            Category::RareTier2 => XP_RARE_TIER2,
            Category::RareTier3 => XP_RARE_TIER3,
            Category::RecoveryOrganism => ORGANISM_XP,
            Category::RecoveryCargo => XP_CARGO,
            Category::HazardCloud => 0,
        }
    }
}

/// Items that can sit in a cargo hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Ore,
    Crystal,
    Isotope,
    Relic,
    /// Recovered cargo container.
    Salvage,
    /// Sub-item found inside cargo.
    Components,
}

/// Autopilot operating mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutopilotMode {
    #[default]
    Unset,
    /// Collect the nearest eligible entity.
    Gather,
    /// Return to home base and hold.
    Base,
    /// Fly to the depot, unload, resume gathering.
    Deposit,
    /// Fly to a manually chosen point, then disengage.
    Travel,
}

/// Secondary drone operating mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroneMode {
    /// Aboard the ship.
    #[default]
    Docked,
    /// Follows the ship.
    Escort,
    /// Gathers independently.
    FreeRoam,
}

/// Long-jump charge stage, derived from remaining countdown fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeStage {
    Spooling,
    Building,
    Critical,
}

/// Long-jump phase as exposed to the frontend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpPhaseKind {
    #[default]
    Idle,
    Charging,
    Traveling,
}

/// How much of an entity an observer can perceive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Hidden,
    /// Radar blip: position only.
    Signal,
    /// Within scan range: position and category.
    Detailed,
}

/// Color hint attached to notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTag {
    Info,
    Success,
    Warning,
    Danger,
}

/// Sound effects the core asks the frontend to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    Pickup,
    RarePickup,
    CargoFull,
    HazardWarning,
    DroneDisrupted,
    JumpSpool,
    JumpBuild,
    JumpCritical,
    JumpLaunch,
    JumpArrive,
    JumpCancelled,
    Deposit,
    Denied,
}

/// Overall game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    Paused,
}
