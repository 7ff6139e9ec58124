//! What happens when the ship touches an entity.
//!
//! Dispatch is by category, hazard first. Every branch reports whether the
//! entity was collected; capacity failures are never errors.

use driftfield_core::components::Payload;
use driftfield_core::constants::*;
use driftfield_core::enums::{Category, ColorTag, ItemKind, SoundEffect};
use driftfield_core::events::SimEvent;

use crate::context::InteractionContext;
use crate::proximity::roll_loot;

/// Resolve one contact. Returns true if the entity should be marked collected.
pub fn dispatch(ctx: &mut InteractionContext<'_>, category: Category, payload: Option<&Payload>) -> bool {
    match category {
        Category::HazardCloud => {
            hazard_contact(ctx);
            false
        }
        Category::RecoveryCargo => recover_cargo(ctx, payload),
        Category::RecoveryOrganism => {
            recover_organism(ctx);
            true
        }
        Category::Ordinary | Category::RareTier1 | Category::RareTier2 | Category::RareTier3 => {
            gather_ore(ctx, category)
        }
    }
}

fn hazard_contact(ctx: &mut InteractionContext<'_>) {
    if ctx.ship.god_mode {
        return;
    }

    let tick = ctx.tick;
    if let Some(drone) = ctx.drone.as_deref_mut() {
        if drone.is_deployed() && !drone.is_disrupted(tick) {
            drone.disrupt(tick);
            log::debug!("drone disrupted by hazard at tick {tick}");
            ctx.emit(SimEvent::notify(
                "Drone disrupted",
                ColorTag::Warning,
                "Interference cloud scrambled the drone; recalled to escort",
            ));
            ctx.emit(SimEvent::sound(SoundEffect::DroneDisrupted));
            return;
        }
    }

    if ctx.cooldowns.hazard_damage.try_fire(tick) {
        ctx.ship.apply_damage(HAZARD_DAMAGE);
    }
    if ctx.cooldowns.hazard_warning.try_fire(tick) {
        ctx.emit(SimEvent::notify(
            "Hazard",
            ColorTag::Danger,
            format!("Hull integrity {:.0}%", ctx.ship.hull / SHIP_MAX_HULL * 100.0),
        ));
        ctx.emit(SimEvent::sound(SoundEffect::HazardWarning));
    }
}

fn recover_cargo(ctx: &mut InteractionContext<'_>, payload: Option<&Payload>) -> bool {
    if !ctx.inventory.try_add(ItemKind::Salvage) {
        cargo_full(ctx);
        return false;
    }

    let mut lost = 0;
    for &item in payload.map(|p| p.items.as_slice()).unwrap_or_default() {
        if !ctx.inventory.try_add(item) {
            lost += 1;
        }
    }
    ctx.progression.grant_xp(XP_CARGO);

    if lost > 0 {
        ctx.emit(SimEvent::notify(
            "Cargo partially recovered",
            ColorTag::Warning,
            format!("{lost} item(s) left behind: hold full"),
        ));
    } else {
        ctx.emit(SimEvent::notify("Cargo recovered", ColorTag::Success, ""));
    }
    ctx.emit(SimEvent::sound(SoundEffect::RarePickup));
    true
}

fn recover_organism(ctx: &mut InteractionContext<'_>) {
    ctx.ship.restore_energy(ORGANISM_ENERGY);
    ctx.progression.grant_xp(ORGANISM_XP);
    ctx.emit(SimEvent::notify(
        "Organism recovered",
        ColorTag::Success,
        format!("+{ORGANISM_ENERGY:.0} energy"),
    ));
    ctx.emit(SimEvent::sound(SoundEffect::Pickup));
}

fn gather_ore(ctx: &mut InteractionContext<'_>, category: Category) -> bool {
    let Some(item) = category.loot_item() else {
        return false;
    };
    let copies = roll_loot(ctx.loot_table, ctx.rng);
    if copies == 0 {
        return false;
    }

    let mut added = 0;
    for _ in 0..copies {
        if !ctx.inventory.try_add(item) {
            break;
        }
        added += 1;
    }

    if added < copies {
        cargo_full(ctx);
    }
    if added == 0 {
        return false;
    }

    ctx.progression.grant_xp(added * category.xp_per_copy());
    let effect = if category == Category::Ordinary {
        SoundEffect::Pickup
    } else {
        ctx.emit(SimEvent::notify(
            format!("{item:?} x{added}"),
            ColorTag::Info,
            "",
        ));
        SoundEffect::RarePickup
    };
    ctx.emit(SimEvent::sound(effect));
    true
}

fn cargo_full(ctx: &mut InteractionContext<'_>) {
    if ctx.cooldowns.cargo_full.try_fire(ctx.tick) {
        ctx.emit(SimEvent::notify(
            "Cargo hold full",
            ColorTag::Warning,
            "Return to the depot to unload",
        ));
        ctx.emit(SimEvent::sound(SoundEffect::CargoFull));
    }
}
