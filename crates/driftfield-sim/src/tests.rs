//! Tests for the spatial index, entity registry, interactions and engine.

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use driftfield_core::commands::PlayerCommand;
use driftfield_core::components::{Collectible, Payload};
use driftfield_core::config::{LootTable, WorldConfig};
use driftfield_core::constants::*;
use driftfield_core::enums::*;
use driftfield_core::events::{NotificationSink, SimEvent};
use driftfield_core::types::{Observer, Position};

use driftfield_pilot::jump::JumpPhase;

use crate::context::{Cooldown, Cooldowns, InteractionContext};
use crate::drone::Drone;
use crate::engine::SimulationEngine;
use crate::persistence::{export_records, import_records, records_from_json, records_to_json};
use crate::proximity::{classify, collides, roll_loot};
use crate::registry::EntityRegistry;
use crate::ship::Ship;
use crate::sinks::{CargoHold, Depot, InventorySink, Progression, ProgressionSink};
use crate::spatial::SpatialIndex;
use crate::systems::navigation::deposit;

// ---- Helpers ----

/// A world with no random population; scenarios place entities by hand.
fn quiet_config() -> WorldConfig {
    WorldConfig {
        target_population: 0,
        ..Default::default()
    }
}

fn home() -> Position {
    WorldConfig::default().home_base
}

fn offset(p: Position, dx: f64, dy: f64) -> Position {
    Position::new(p.x + dx, p.y + dy)
}

fn has_notify(events: &[SimEvent], wanted: &str) -> bool {
    events
        .iter()
        .any(|e| matches!(e, SimEvent::Notify { title, .. } if title == wanted))
}

fn count_notify(events: &[SimEvent], wanted: &str) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SimEvent::Notify { title, .. } if title == wanted))
        .count()
}

/// Owns everything an `InteractionContext` borrows.
struct Harness {
    ship: Ship,
    drone: Option<Drone>,
    cargo: CargoHold,
    progression: Progression,
    events: Vec<SimEvent>,
    rng: ChaCha8Rng,
    loot: LootTable,
    cooldowns: Cooldowns,
    tick: u64,
}

impl Harness {
    fn new(position: Position) -> Self {
        Self {
            ship: Ship::new(position),
            drone: None,
            cargo: CargoHold::new(CARGO_CAPACITY),
            progression: Progression::default(),
            events: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(7),
            loot: LootTable::default(),
            cooldowns: Cooldowns::default(),
            tick: 0,
        }
    }

    fn ctx(&mut self) -> InteractionContext<'_> {
        InteractionContext {
            ship: &mut self.ship,
            drone: self.drone.as_mut(),
            inventory: &mut self.cargo,
            progression: &mut self.progression,
            events: &mut self.events,
            rng: &mut self.rng,
            loot_table: &self.loot,
            cooldowns: &mut self.cooldowns,
            scan_radius: SHIP_SCAN_RADIUS,
            radar_radius: SHIP_RADAR_RADIUS,
            tick: self.tick,
        }
    }
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl NotificationSink for Recorder {
    fn notify(&mut self, title: &str, _color: ColorTag, _detail: &str) {
        self.0.lock().unwrap().push(title.to_string());
    }

    fn play_sound(&mut self, effect: SoundEffect) {
        self.0.lock().unwrap().push(format!("{effect:?}"));
    }
}

// ---- Spatial index ----

#[test]
fn test_index_insert_query_remove() {
    let mut index = SpatialIndex::new(600.0);
    let p = Position::new(100.0, 100.0);
    index.insert(1u32, &p, 10.0);
    assert_eq!(index.cell_count(), 1);
    assert_eq!(index.query(120.0, 90.0, 50.0), vec![1]);

    index.remove(1, &p, 10.0);
    assert!(index.is_empty());
    assert!(index.query(100.0, 100.0, 1_000.0).is_empty());
}

#[test]
fn test_index_multi_cell_entity_deduplicated() {
    let mut index = SpatialIndex::new(600.0);
    let p = Position::new(600.0, 600.0);
    index.insert(9u32, &p, 50.0);
    assert_eq!(index.cell_count(), 4);
    assert_eq!(index.reference_count(), 4);
    assert_eq!(index.query(600.0, 600.0, 100.0), vec![9]);

    // One removal clears all four cells.
    index.remove(9, &p, 50.0);
    assert_eq!(index.reference_count(), 0);
    assert!(index.is_empty());
}

#[test]
fn test_index_remove_is_idempotent() {
    let mut index = SpatialIndex::new(600.0);
    let a = Position::new(10.0, 10.0);
    let b = Position::new(20.0, 20.0);
    index.insert(1u32, &a, 5.0);
    index.insert(2u32, &b, 5.0);

    index.remove(1, &a, 5.0);
    index.remove(1, &a, 5.0);
    index.remove(3, &b, 5.0); // never inserted
    assert_eq!(index.query(0.0, 0.0, 100.0), vec![2]);
    assert_eq!(index.cell_count(), 1);
}

#[test]
fn test_index_negative_coordinates_floor() {
    let index = SpatialIndex::<u32>::new(600.0);
    assert_eq!(index.cell_key(-1.0, -1.0), (-1, -1));
    assert_eq!(index.cell_key(0.0, 599.9), (0, 0));
    assert_eq!(index.cell_key(-600.0, 600.0), (-1, 1));
}

#[test]
fn test_index_query_order_is_stable() {
    let mut index = SpatialIndex::new(100.0);
    for id in [5u32, 3, 9, 1, 7] {
        index.insert(id, &Position::new(id as f64 * 40.0, 0.0), 30.0);
    }
    let first = index.query(200.0, 0.0, 500.0);
    assert_eq!(first, vec![1, 3, 5, 7, 9]);
    assert_eq!(index.query(200.0, 0.0, 500.0), first);
}

#[test]
fn test_index_clear() {
    let mut index = SpatialIndex::new(100.0);
    index.insert(1u32, &Position::new(0.0, 0.0), 250.0);
    assert!(index.cell_count() > 1);
    index.clear();
    assert!(index.is_empty());
    assert_eq!(index.cell_size(), 100.0);
}

// ---- Proximity rules ----

#[test]
fn test_visibility_uses_edge_distance() {
    let observer = Observer {
        position: Position::new(0.0, 0.0),
        heading: 0.0,
        scan_radius: 500.0,
        radar_radius: 1_200.0,
    };
    let at = |x: f64| Position::new(x, 0.0);
    assert_eq!(classify(&observer, &at(510.0), 18.0), Visibility::Detailed);
    assert_eq!(classify(&observer, &at(1_000.0), 18.0), Visibility::Signal);
    assert_eq!(classify(&observer, &at(1_300.0), 160.0), Visibility::Signal);
    assert_eq!(classify(&observer, &at(2_000.0), 160.0), Visibility::Hidden);
}

#[test]
fn test_collision_is_strict_overlap() {
    let ship = Position::new(0.0, 0.0);
    assert!(collides(&ship, 14.0, &Position::new(30.0, 0.0), 18.0));
    assert!(!collides(&ship, 14.0, &Position::new(32.0, 0.0), 18.0));
}

#[test]
fn test_roll_loot_respects_table() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for _ in 0..50 {
        assert_eq!(roll_loot(&LootTable::fixed(2), &mut rng), 2);
    }
    let empty = LootTable { entries: vec![] };
    assert_eq!(roll_loot(&empty, &mut rng), 0);

    let default = LootTable::default();
    for _ in 0..200 {
        assert!(roll_loot(&default, &mut rng) <= 4);
    }
}

#[test]
fn test_cooldown_rate_limits() {
    let mut cd = Cooldown::new(30);
    assert!(cd.try_fire(5));
    assert!(!cd.try_fire(6));
    assert!(!cd.try_fire(34));
    assert!(cd.try_fire(35));
}

// ---- Sinks ----

#[test]
fn test_cargo_hold_capacity() {
    let mut hold = CargoHold::new(2);
    assert!(hold.try_add(ItemKind::Ore));
    assert!(hold.try_add(ItemKind::Crystal));
    assert!(!hold.try_add(ItemKind::Relic));
    assert!(hold.is_full());
    assert_eq!(hold.free_slots(), 0);
    assert_eq!(hold.count_of(ItemKind::Ore), 1);
}

#[test]
fn test_transfer_stops_at_first_refusal() {
    let mut hold = CargoHold::new(10);
    for item in [ItemKind::Ore, ItemKind::Crystal, ItemKind::Relic] {
        hold.try_add(item);
    }
    let mut depot = Depot::new(2);
    assert_eq!(hold.transfer_into(&mut depot), 2);
    assert_eq!(depot.items(), &[ItemKind::Ore, ItemKind::Crystal]);
    assert_eq!(hold.items(), &[ItemKind::Relic]);
}

#[test]
fn test_progression_accumulates() {
    let mut p = Progression::default();
    p.grant_xp(3);
    p.grant_xp(12);
    assert_eq!(p.total_xp, 15);
}

// ---- Registry ----

#[test]
fn test_registry_initialize_respects_protected_zone() {
    let config = WorldConfig {
        target_population: 300,
        ..Default::default()
    };
    let mut registry = EntityRegistry::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let placed = registry.initialize(300, &mut rng);

    assert_eq!(placed, 300);
    assert_eq!(registry.live_count(), 300);
    for entity in registry.entities() {
        let (pos, c) = registry.entry(entity).unwrap();
        assert!(pos.distance_to(&config.home_base) >= config.protected_radius);
        assert!(config.bounds().contains(&pos));
        assert_eq!(c.radius, c.category.radius());
        assert!(registry.query(pos.x, pos.y, 0.0).contains(&entity));
    }
}

#[test]
fn test_cargo_spawns_carry_payload() {
    let config = WorldConfig {
        target_population: 2_000,
        ..Default::default()
    };
    let mut registry = EntityRegistry::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    registry.initialize(2_000, &mut rng);

    let mut cargo_seen = 0;
    for (_, (c, payload)) in registry
        .world()
        .query::<(&Collectible, &Payload)>()
        .iter()
    {
        assert_eq!(c.category, Category::RecoveryCargo);
        assert!(!payload.items.is_empty());
        assert!(payload.items.len() <= CARGO_MAX_PAYLOAD as usize);
        cargo_seen += 1;
    }
    assert!(cargo_seen > 0, "2000 spawns should include some cargo");
}

#[test]
fn test_collected_entity_leaves_index_immediately() {
    let mut registry = EntityRegistry::new(&quiet_config());
    let p = Position::new(1_000.0, 1_000.0);
    let e = registry.spawn_at(Category::Ordinary, p);
    assert_eq!(registry.query(p.x, p.y, 50.0), vec![e]);

    registry.mark_collected(e);
    registry.mark_collected(e);
    assert!(registry.query(p.x, p.y, 50.0).is_empty());
    assert!(registry.index().is_empty());
    assert_eq!(registry.live_count(), 0);
    assert_eq!(registry.len(), 1, "despawned at the next sweep");
    assert!(registry.get(e).unwrap().collected);
}

#[test]
fn test_population_stable_without_collection() {
    let config = WorldConfig {
        target_population: 300,
        ..Default::default()
    };
    let mut registry = EntityRegistry::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    registry.initialize(300, &mut rng);

    // Home base sits inside the protected zone, so nothing is touched.
    let mut h = Harness::new(config.home_base);
    for tick in 0..10 {
        h.tick = tick;
        let report = registry.tick(&mut h.ctx());
        assert_eq!(report.swept, 0);
        assert_eq!(report.spawned, 0);
        assert_eq!(report.contacts, 0);
        assert_eq!(registry.live_count(), 300);
    }
}

#[test]
fn test_sweep_then_backfill_away_from_observer() {
    let config = WorldConfig {
        target_population: 300,
        ..Default::default()
    };
    let mut registry = EntityRegistry::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    registry.initialize(300, &mut rng);

    let before = registry.entities();
    for &e in before.iter().take(5) {
        registry.mark_collected(e);
    }
    assert_eq!(registry.live_count(), 295);

    let mut h = Harness::new(config.home_base);
    let report = registry.tick(&mut h.ctx());
    assert_eq!(report.swept, 5);
    assert_eq!(report.spawned + report.spawn_failures, 5);
    assert_eq!(registry.live_count(), 295 + report.spawned);
    assert_eq!(registry.len(), registry.live_count());

    for e in registry.entities() {
        if before[5..].contains(&e) {
            continue;
        }
        let (pos, _) = registry.entry(e).unwrap();
        assert!(pos.distance_to(&config.home_base) >= config.spawn_clearance);
    }
}

#[test]
fn test_loot_two_copies_with_one_free_slot() {
    let mut registry = EntityRegistry::new(&quiet_config());
    let mut h = Harness::new(home());
    h.cargo = CargoHold::new(5);
    for _ in 0..4 {
        h.cargo.try_add(ItemKind::Ore);
    }
    h.loot = LootTable::fixed(2);
    let e = registry.spawn_at(Category::Ordinary, offset(home(), 5.0, 0.0));

    let report = registry.tick(&mut h.ctx());
    assert_eq!(report.collected, 1);
    assert!(registry.get(e).unwrap().collected);
    assert_eq!(h.cargo.current_count(), 5);
    assert_eq!(h.progression.total_xp, u64::from(XP_ORDINARY));
    assert!(has_notify(&h.events, "Cargo hold full"));

    // Partial pickups are not reverted; the entity is swept next tick.
    h.tick = 1;
    let report = registry.tick(&mut h.ctx());
    assert_eq!(report.swept, 1);
    assert_eq!(h.cargo.current_count(), 5);
    assert!(registry.is_empty());
}

#[test]
fn test_full_inventory_leaves_entity_and_throttles_notice() {
    let mut registry = EntityRegistry::new(&quiet_config());
    let mut h = Harness::new(home());
    h.cargo = CargoHold::new(0);
    h.loot = LootTable::fixed(1);
    let e = registry.spawn_at(Category::RareTier2, offset(home(), 0.0, 10.0));

    for tick in 0..10 {
        h.tick = tick;
        registry.tick(&mut h.ctx());
    }
    assert!(!registry.get(e).unwrap().collected);
    assert_eq!(registry.live_count(), 1);
    assert_eq!(count_notify(&h.events, "Cargo hold full"), 1);
    assert_eq!(h.progression.total_xp, 0);
}

#[test]
fn test_zero_copy_roll_leaves_entity() {
    let mut registry = EntityRegistry::new(&quiet_config());
    let mut h = Harness::new(home());
    h.loot = LootTable::fixed(0);
    let e = registry.spawn_at(Category::Ordinary, home());

    registry.tick(&mut h.ctx());
    assert!(!registry.get(e).unwrap().collected);
    assert_eq!(h.cargo.current_count(), 0);
    assert!(h.events.is_empty());
}

#[test]
fn test_hazard_damage_and_warning_cooldowns() {
    let mut registry = EntityRegistry::new(&quiet_config());
    let mut h = Harness::new(home());
    let e = registry.spawn_at(Category::HazardCloud, offset(home(), 100.0, 0.0));

    registry.tick(&mut h.ctx());
    assert_eq!(h.ship.hull, SHIP_MAX_HULL - HAZARD_DAMAGE);

    h.tick = 1;
    registry.tick(&mut h.ctx());
    assert_eq!(h.ship.hull, SHIP_MAX_HULL - HAZARD_DAMAGE);

    h.tick = HAZARD_DAMAGE_COOLDOWN_TICKS;
    registry.tick(&mut h.ctx());
    assert_eq!(h.ship.hull, SHIP_MAX_HULL - 2.0 * HAZARD_DAMAGE);

    assert_eq!(count_notify(&h.events, "Hazard"), 1);
    assert!(!registry.get(e).unwrap().collected, "hazards are never collected");
}

#[test]
fn test_god_mode_ignores_hazard() {
    let mut registry = EntityRegistry::new(&quiet_config());
    let mut h = Harness::new(home());
    h.ship.god_mode = true;
    registry.spawn_at(Category::HazardCloud, home());

    registry.tick(&mut h.ctx());
    assert_eq!(h.ship.hull, SHIP_MAX_HULL);
    assert!(h.events.is_empty());
}

#[test]
fn test_hazard_disrupts_deployed_drone_first() {
    let mut registry = EntityRegistry::new(&quiet_config());
    let mut h = Harness::new(home());
    let mut drone = Drone::new(home());
    drone.mode = DroneMode::FreeRoam;
    h.drone = Some(drone);
    registry.spawn_at(Category::HazardCloud, home());

    registry.tick(&mut h.ctx());
    let drone = h.drone.as_ref().unwrap();
    assert!(drone.is_disrupted(0));
    assert_eq!(drone.mode, DroneMode::Escort);
    assert_eq!(h.ship.hull, SHIP_MAX_HULL);
    assert!(has_notify(&h.events, "Drone disrupted"));

    // Already disrupted: the ship takes the hit.
    h.tick = 1;
    registry.tick(&mut h.ctx());
    assert_eq!(h.ship.hull, SHIP_MAX_HULL - HAZARD_DAMAGE);
    assert!(h.drone.as_ref().unwrap().is_disrupted(1));
    assert!(!h.drone.as_ref().unwrap().is_disrupted(u64::from(DRONE_DISRUPT_TICKS)));
}

#[test]
fn test_docked_drone_is_not_disrupted() {
    let mut registry = EntityRegistry::new(&quiet_config());
    let mut h = Harness::new(home());
    h.drone = Some(Drone::new(home()));
    registry.spawn_at(Category::HazardCloud, home());

    registry.tick(&mut h.ctx());
    assert!(!h.drone.as_ref().unwrap().is_disrupted(0));
    assert_eq!(h.ship.hull, SHIP_MAX_HULL - HAZARD_DAMAGE);
}

#[test]
fn test_ghost_suppresses_collisions() {
    let mut registry = EntityRegistry::new(&quiet_config());
    let mut h = Harness::new(home());
    h.ship.ghost = true;
    registry.spawn_at(Category::HazardCloud, home());

    let report = registry.tick(&mut h.ctx());
    assert_eq!(report.contacts, 0);
    assert_eq!(h.ship.hull, SHIP_MAX_HULL);

    h.ship.ghost = false;
    h.tick = 1;
    let report = registry.tick(&mut h.ctx());
    assert_eq!(report.contacts, 1);
    assert_eq!(h.ship.hull, SHIP_MAX_HULL - HAZARD_DAMAGE);
}

#[test]
fn test_cargo_payload_failures_not_reverted() {
    let mut registry = EntityRegistry::new(&quiet_config());
    let mut h = Harness::new(home());
    h.cargo = CargoHold::new(2);
    let e = registry.spawn_with_payload(
        Category::RecoveryCargo,
        home(),
        vec![ItemKind::Ore, ItemKind::Crystal, ItemKind::Relic],
    );

    registry.tick(&mut h.ctx());
    assert!(registry.get(e).unwrap().collected);
    assert_eq!(h.cargo.items(), &[ItemKind::Salvage, ItemKind::Ore]);
    assert_eq!(h.progression.total_xp, u64::from(XP_CARGO));
    assert_eq!(count_notify(&h.events, "Cargo partially recovered"), 1);
}

#[test]
fn test_cargo_needs_room_for_salvage() {
    let mut registry = EntityRegistry::new(&quiet_config());
    let mut h = Harness::new(home());
    h.cargo = CargoHold::new(0);
    let e = registry.spawn_with_payload(Category::RecoveryCargo, home(), vec![ItemKind::Ore]);

    registry.tick(&mut h.ctx());
    assert!(!registry.get(e).unwrap().collected);
    assert_eq!(h.progression.total_xp, 0);
}

#[test]
fn test_organism_restores_energy_even_when_full() {
    let mut registry = EntityRegistry::new(&quiet_config());
    let mut h = Harness::new(home());
    h.cargo = CargoHold::new(0);
    h.ship.energy = 90.0;
    let e = registry.spawn_at(Category::RecoveryOrganism, home());

    registry.tick(&mut h.ctx());
    assert!(registry.get(e).unwrap().collected);
    assert_eq!(h.ship.energy, SHIP_MAX_ENERGY);
    assert_eq!(h.progression.total_xp, u64::from(ORGANISM_XP));
}

#[test]
fn test_candidates_follow_index_order() {
    let mut registry = EntityRegistry::new(&quiet_config());
    let a = registry.spawn_at(Category::Ordinary, Position::new(500.0, 500.0));
    let b = registry.spawn_at(Category::HazardCloud, Position::new(600.0, 500.0));
    let c = registry.spawn_at(Category::RareTier3, Position::new(700.0, 500.0));
    registry.mark_collected(b);

    let ids: Vec<_> = registry
        .candidates(&Position::new(600.0, 500.0), 300.0)
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![a, c]);
}

// ---- Persistence ----

#[test]
fn test_records_rebuild_index() {
    let mut registry = EntityRegistry::new(&quiet_config());
    registry.spawn_at(Category::Ordinary, Position::new(100.0, 100.0));
    let gone = registry.spawn_at(Category::RareTier1, Position::new(200.0, 100.0));
    registry.spawn_at(Category::HazardCloud, Position::new(5_000.0, 5_000.0));
    registry.mark_collected(gone);

    let records = export_records(&registry);
    assert_eq!(records.len(), 3);
    assert_eq!(records.iter().filter(|r| r.collected).count(), 1);

    let json = records_to_json(&records).unwrap();
    let parsed = records_from_json(&json).unwrap();
    assert_eq!(parsed, records);

    let mut restored = EntityRegistry::new(&quiet_config());
    assert_eq!(import_records(&mut restored, &parsed), 2);
    assert_eq!(restored.live_count(), 2);
    assert_eq!(restored.query(100.0, 100.0, 10.0).len(), 1);
    assert_eq!(restored.query(5_000.0, 5_000.0, 0.0).len(), 1);
    let categories: Vec<_> = restored
        .entities()
        .into_iter()
        .filter_map(|e| restored.get(e))
        .map(|c| c.category)
        .collect();
    assert_eq!(categories, vec![Category::Ordinary, Category::HazardCloud]);
}

#[test]
fn test_malformed_records_rejected() {
    assert!(records_from_json("{not json").is_err());
    assert!(records_from_json(r#"[{"x": 1.0, "y": 2.0, "category": "Dragon", "collected": false}]"#).is_err());
}

// ---- Engine: determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = WorldConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut engine_a = SimulationEngine::new(config.clone());
    let mut engine_b = SimulationEngine::new(config);
    engine_a.queue_command(PlayerCommand::ToggleAutopilot);
    engine_b.queue_command(PlayerCommand::ToggleAutopilot);

    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let engine_a = SimulationEngine::new(WorldConfig {
        seed: 111,
        ..Default::default()
    });
    let engine_b = SimulationEngine::new(WorldConfig {
        seed: 222,
        ..Default::default()
    });
    assert_ne!(engine_a.export_entities(), engine_b.export_entities());
}

// ---- Engine: lifecycle ----

#[test]
fn test_population_held_at_target() {
    let mut engine = SimulationEngine::new(WorldConfig::default());
    for _ in 0..30 {
        let snap = engine.tick();
        assert_eq!(snap.population, TARGET_POPULATION);
    }
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = SimulationEngine::new(quiet_config());
    engine.queue_command(PlayerCommand::ManualInput {
        turn: 0.0,
        thrust: true,
        brake: false,
    });
    engine.tick();
    engine.queue_command(PlayerCommand::Pause);
    let paused = engine.tick();
    assert_eq!(paused.phase, GamePhase::Paused);
    let frozen = engine.ship().position;

    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 1);
    assert_eq!(engine.ship().position, frozen);

    engine.queue_command(PlayerCommand::Resume);
    engine.tick();
    assert_eq!(engine.time().tick, 2);
}

#[test]
fn test_tick_timing_30_ticks_one_second() {
    let mut engine = SimulationEngine::new(quiet_config());
    for _ in 0..30 {
        engine.tick();
    }
    assert!((engine.time().elapsed_secs - 1.0).abs() < 1e-9);
}

#[test]
fn test_manual_flight() {
    let mut engine = SimulationEngine::new(quiet_config());
    engine.queue_command(PlayerCommand::ManualInput {
        turn: 0.0,
        thrust: true,
        brake: false,
    });
    for _ in 0..60 {
        engine.tick();
    }
    assert_eq!(engine.ship().speed, SHIP_MAX_SPEED);
    assert!(engine.ship().position.x > home().x);

    engine.queue_command(PlayerCommand::ManualInput {
        turn: 0.0,
        thrust: false,
        brake: true,
    });
    for _ in 0..30 {
        engine.tick();
    }
    assert_eq!(engine.ship().speed, 0.0);
}

#[test]
fn test_snapshot_contacts_reveal_category_in_scan_range() {
    let mut engine = SimulationEngine::new(quiet_config());
    engine
        .registry_mut()
        .spawn_at(Category::RareTier1, offset(home(), 300.0, 0.0));
    engine
        .registry_mut()
        .spawn_at(Category::RareTier2, offset(home(), 0.0, 1_000.0));
    engine
        .registry_mut()
        .spawn_at(Category::Ordinary, offset(home(), 0.0, -5_000.0));

    let snap = engine.tick();
    assert_eq!(snap.contacts.len(), 2);
    let detailed = snap
        .contacts
        .iter()
        .find(|c| c.visibility == Visibility::Detailed)
        .unwrap();
    assert_eq!(detailed.category, Some(Category::RareTier1));
    let signal = snap
        .contacts
        .iter()
        .find(|c| c.visibility == Visibility::Signal)
        .unwrap();
    assert_eq!(signal.category, None);
}

#[test]
fn test_snapshot_serializes_compactly() {
    let mut engine = SimulationEngine::new(WorldConfig::default());
    engine.queue_command(PlayerCommand::ToggleAutopilot);
    let mut snap = engine.tick();
    for _ in 0..60 {
        snap = engine.tick();
    }
    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.len() < 20_000, "snapshot is {} bytes", json.len());
}

// ---- Engine: autopilot ----

#[test]
fn test_travel_arrival_terminates() {
    let mut engine = SimulationEngine::new(quiet_config());
    let target = offset(home(), 800.0, 600.0);
    engine.queue_command(PlayerCommand::SetManualTarget {
        x: target.x,
        y: target.y,
    });

    let distance = home().distance_to(&target);
    let budget = (2.0 * distance / (SHIP_MAX_SPEED * DT)) as usize + 60;
    let mut ticks = 0;
    engine.tick();
    while engine.navigation().enabled && ticks < budget {
        engine.tick();
        ticks += 1;
    }

    assert!(!engine.navigation().enabled, "still travelling after {ticks} ticks");
    assert_eq!(engine.navigation().mode, AutopilotMode::Unset);
    assert!(engine.ship().position.distance_to(&target) <= ARRIVAL_RADIUS + SHIP_MAX_SPEED * DT);
}

#[test]
fn test_manual_target_outside_world_refused() {
    let mut engine = SimulationEngine::new(quiet_config());
    engine.queue_command(PlayerCommand::SetManualTarget {
        x: -100.0,
        y: 500.0,
    });
    let snap = engine.tick();
    assert!(!snap.autopilot.enabled);
    assert!(has_notify(&snap.events, "Target out of range"));
}

#[test]
fn test_autopilot_gathers_nearby_entity() {
    let mut config = quiet_config();
    config.loot_table = LootTable::fixed(1);
    let mut engine = SimulationEngine::new(config);
    let e = engine
        .registry_mut()
        .spawn_at(Category::Ordinary, offset(home(), 300.0, 200.0));
    engine.queue_command(PlayerCommand::ToggleAutopilot);

    let mut collected = false;
    for _ in 0..300 {
        engine.tick();
        if engine.cargo().current_count() == 1 {
            collected = true;
            break;
        }
    }
    assert!(collected);
    assert_eq!(engine.progression().total_xp, u64::from(XP_ORDINARY));
    assert!(engine.registry().get(e).map_or(true, |c| c.collected));
}

#[test]
fn test_autopilot_deposit_cycle() {
    let mut config = quiet_config();
    config.loot_table = LootTable::fixed(1);
    config.cargo_capacity = 1;
    let mut engine = SimulationEngine::new(config);
    engine
        .registry_mut()
        .spawn_at(Category::Ordinary, offset(home(), 0.0, 250.0));
    engine.queue_command(PlayerCommand::ToggleAutopilot);

    let mut saw_deposit_mode = false;
    for _ in 0..900 {
        engine.tick();
        saw_deposit_mode |= engine.navigation().mode == AutopilotMode::Deposit;
        if engine.depot().current_count() == 1 {
            break;
        }
    }
    assert!(saw_deposit_mode);
    assert_eq!(engine.depot().current_count(), 1);
    assert_eq!(engine.cargo().current_count(), 0);
    assert_eq!(engine.navigation().mode, AutopilotMode::Gather);
}

#[test]
fn test_autopilot_stops_when_depot_refuses_cargo() {
    let mut config = quiet_config();
    config.loot_table = LootTable::fixed(1);
    config.cargo_capacity = 1;
    config.depot_capacity = 0;
    let mut engine = SimulationEngine::new(config);
    engine
        .registry_mut()
        .spawn_at(Category::Ordinary, offset(home(), 0.0, 250.0));
    engine.queue_command(PlayerCommand::ToggleAutopilot);

    let mut events = Vec::new();
    let mut mode_changes = 0;
    let mut last_mode = engine.navigation().mode;
    for _ in 0..1200 {
        events.extend(engine.tick().events);
        let mode = engine.navigation().mode;
        if mode != last_mode {
            mode_changes += 1;
            last_mode = mode;
        }
    }

    assert_eq!(count_notify(&events, "Depot full"), 1);
    assert_eq!(count_notify(&events, "Autopilot halted"), 1);
    let denied = events
        .iter()
        .filter(|e| matches!(e, SimEvent::Sound { effect: SoundEffect::Denied }))
        .count();
    assert_eq!(denied, 1);

    // Unset -> Gather -> Deposit -> Unset, with no cycling at the depot.
    assert!(mode_changes <= 3, "mode changed {mode_changes} times");
    assert!(!engine.navigation().enabled);
    assert_eq!(engine.navigation().mode, AutopilotMode::Unset);
    assert_eq!(engine.cargo().current_count(), 1);
    assert_eq!(engine.depot().current_count(), 0);
}

#[test]
fn test_depot_full_notice_is_throttled() {
    let ore = Category::Ordinary.loot_item().unwrap();
    let mut cargo = CargoHold::new(2);
    assert!(cargo.try_add(ore));
    assert!(cargo.try_add(ore));
    let mut depot = Depot::new(0);
    let mut notice = Cooldown::new(DEPOT_FULL_NOTIFY_COOLDOWN_TICKS);
    let mut events = Vec::new();

    for tick in 0..300 {
        assert_eq!(deposit(&mut cargo, &mut depot, &mut notice, &mut events, tick), 0);
    }
    // Fires at tick 0 and tick 150 only.
    assert_eq!(count_notify(&events, "Depot full"), 2);
    assert_eq!(cargo.current_count(), 2);
}

#[test]
fn test_partial_deposit_resumes_gather() {
    let ore = Category::Ordinary.loot_item().unwrap();
    let mut config = quiet_config();
    config.cargo_capacity = 3;
    config.depot_capacity = 1;
    let mut engine = SimulationEngine::new(config.clone());
    engine.ship_mut().position = config.depot;
    engine.queue_command(PlayerCommand::ToggleAutopilot);
    engine.tick();
    engine.queue_command(PlayerCommand::SetAutopilotMode {
        mode: AutopilotMode::Deposit,
    });
    engine.cargo_mut().try_add(ore);
    engine.cargo_mut().try_add(ore);

    let snap = engine.tick();
    assert_eq!(engine.depot().current_count(), 1);
    assert_eq!(engine.cargo().current_count(), 1);
    assert!(has_notify(&snap.events, "Depot full"));
    // The hold has room again, so gathering resumes.
    assert!(engine.navigation().enabled);
    assert_eq!(engine.navigation().mode, AutopilotMode::Gather);
}

#[test]
fn test_autopilot_holds_while_jump_charges() {
    let mut engine = SimulationEngine::new(quiet_config());
    engine.queue_commands([PlayerCommand::ToggleAutopilot, PlayerCommand::AttemptJump]);
    for _ in 0..10 {
        engine.tick();
    }
    assert!(matches!(engine.ship().jump, JumpPhase::Charging { .. }));
    assert_eq!(engine.ship().heading, 0.0);
    assert!(engine.navigation().last_target.is_none());
}

// ---- Engine: long jump ----

#[test]
fn test_jump_rejected_at_world_edge() {
    let mut engine = SimulationEngine::new(quiet_config());
    engine.ship_mut().position = Position::new(WORLD_WIDTH - 10.0, home().y);
    engine.ship_mut().heading = 0.0;
    engine.queue_command(PlayerCommand::AttemptJump);

    let snap = engine.tick();
    assert_eq!(snap.ship.jump_phase, JumpPhaseKind::Idle);
    assert_eq!(snap.ship.energy, SHIP_MAX_ENERGY);
    assert!(has_notify(&snap.events, "Jump unavailable"));
}

#[test]
fn test_jump_travel_is_ghosted_through_hazard() {
    let mut engine = SimulationEngine::new(quiet_config());
    engine
        .registry_mut()
        .spawn_at(Category::HazardCloud, offset(home(), 2_000.0, 0.0));
    engine.queue_command(PlayerCommand::AttemptJump);

    let mut launched = false;
    for _ in 0..=JUMP_CHARGE_TICKS {
        let snap = engine.tick();
        if snap.ship.jump_phase == JumpPhaseKind::Traveling {
            assert!(snap.ship.ghost);
            assert_eq!(snap.ship.energy, 0.0);
            launched = true;
            break;
        }
    }
    assert!(launched);

    let mut arrived = false;
    for _ in 0..200 {
        let snap = engine.tick();
        if snap.ship.jump_phase == JumpPhaseKind::Idle {
            assert!(!snap.ship.ghost);
            assert_eq!(snap.ship.speed, 0.0);
            arrived = true;
            break;
        }
    }
    assert!(arrived);
    assert_eq!(engine.ship().hull, SHIP_MAX_HULL);

    let final_energy = SHIP_MAX_ENERGY - JUMP_CHARGE_DRAIN * JUMP_CHARGE_TICKS as f64;
    let expected_x = home().x + final_energy * JUMP_DISTANCE_PER_ENERGY;
    assert!((engine.ship().position.x - expected_x).abs() < 1e-6);
}

#[test]
fn test_manual_input_cancels_charge() {
    let mut engine = SimulationEngine::new(quiet_config());
    engine.queue_command(PlayerCommand::AttemptJump);
    engine.tick();
    assert!(matches!(engine.ship().jump, JumpPhase::Charging { .. }));

    engine.queue_command(PlayerCommand::ManualInput {
        turn: 0.5,
        thrust: false,
        brake: false,
    });
    let snap = engine.tick();
    assert_eq!(snap.ship.jump_phase, JumpPhaseKind::Idle);
    assert!(has_notify(&snap.events, "Jump cancelled"));
}

#[test]
fn test_cancel_jump_command() {
    let mut engine = SimulationEngine::new(quiet_config());
    engine.queue_command(PlayerCommand::AttemptJump);
    engine.tick();
    engine.queue_command(PlayerCommand::CancelJump);
    let snap = engine.tick();
    assert_eq!(snap.ship.jump_phase, JumpPhaseKind::Idle);
    assert!(snap.ship.energy < SHIP_MAX_ENERGY);
    assert!(snap
        .events
        .contains(&SimEvent::sound(SoundEffect::JumpCancelled)));
}

// ---- Engine: drone ----

fn drone_config() -> WorldConfig {
    WorldConfig {
        drone_enabled: true,
        ..quiet_config()
    }
}

#[test]
fn test_drone_absent_by_default() {
    let mut engine = SimulationEngine::new(quiet_config());
    engine.queue_command(PlayerCommand::SetDroneMode {
        mode: DroneMode::FreeRoam,
    });
    let snap = engine.tick();
    assert!(snap.drone.is_none());
    assert!(has_notify(&snap.events, "No drone installed"));
}

#[test]
fn test_drone_free_roam_collects() {
    let mut engine = SimulationEngine::new(drone_config());
    let e = engine
        .registry_mut()
        .spawn_at(Category::RareTier1, offset(home(), 200.0, 0.0));
    engine.queue_command(PlayerCommand::SetDroneMode {
        mode: DroneMode::FreeRoam,
    });

    for _ in 0..120 {
        engine.tick();
    }
    let drone = engine.drone().unwrap();
    assert_eq!(drone.hold, vec![ItemKind::Crystal]);
    assert!(engine.registry().get(e).map_or(true, |c| c.collected));
    assert_eq!(engine.progression().total_xp, u64::from(XP_RARE_TIER1));
}

#[test]
fn test_drone_unloads_full_hold_into_cargo() {
    let mut engine = SimulationEngine::new(drone_config());
    for i in 0..DRONE_CAPACITY {
        engine
            .registry_mut()
            .spawn_at(Category::Ordinary, offset(home(), 150.0 + 40.0 * i as f64, 80.0));
    }
    engine.queue_command(PlayerCommand::SetDroneMode {
        mode: DroneMode::FreeRoam,
    });

    for _ in 0..900 {
        engine.tick();
        if engine.cargo().current_count() == DRONE_CAPACITY {
            break;
        }
    }
    assert_eq!(engine.cargo().current_count(), DRONE_CAPACITY);
    assert!(engine.drone().unwrap().hold.is_empty());
}

#[test]
fn test_docking_unloads_drone() {
    let mut engine = SimulationEngine::new(drone_config());
    engine
        .registry_mut()
        .spawn_at(Category::Ordinary, offset(home(), 150.0, 0.0));
    engine.queue_command(PlayerCommand::SetDroneMode {
        mode: DroneMode::FreeRoam,
    });
    for _ in 0..120 {
        engine.tick();
    }
    assert_eq!(engine.drone().unwrap().hold.len(), 1);

    engine.queue_command(PlayerCommand::SetDroneMode {
        mode: DroneMode::Docked,
    });
    let snap = engine.tick();
    assert_eq!(snap.drone.unwrap().held, 0);
    assert_eq!(engine.cargo().current_count(), 1);
}

#[test]
fn test_disrupted_drone_refuses_orders() {
    let mut engine = SimulationEngine::new(drone_config());
    engine
        .registry_mut()
        .spawn_at(Category::HazardCloud, home());
    engine.queue_command(PlayerCommand::SetDroneMode {
        mode: DroneMode::Escort,
    });
    let snap = engine.tick();
    assert!(snap.drone.as_ref().unwrap().disrupted);
    assert_eq!(snap.ship.hull, SHIP_MAX_HULL);

    engine.queue_command(PlayerCommand::SetDroneMode {
        mode: DroneMode::FreeRoam,
    });
    let snap = engine.tick();
    assert!(has_notify(&snap.events, "Drone offline"));
    assert_eq!(snap.drone.unwrap().mode, DroneMode::Escort);
}

// ---- Engine: collaborators ----

#[test]
fn test_notifier_receives_events() {
    let recorder = Recorder::default();
    let mut engine = SimulationEngine::new(quiet_config());
    engine.attach_notifier(Box::new(recorder.clone()));
    engine.queue_command(PlayerCommand::SetManualTarget {
        x: 1.0e9,
        y: 0.0,
    });
    engine.tick();

    let seen = recorder.0.lock().unwrap().clone();
    assert_eq!(seen, vec!["Target out of range".to_string(), "Denied".to_string()]);

    assert!(engine.detach_notifier().is_some());
    engine.queue_command(PlayerCommand::SetManualTarget {
        x: 1.0e9,
        y: 0.0,
    });
    engine.tick();
    assert_eq!(recorder.0.lock().unwrap().len(), 2);
}

#[test]
fn test_export_and_restore_entities() {
    let mut source = SimulationEngine::new(WorldConfig {
        target_population: 50,
        ..Default::default()
    });
    source.tick();
    let records = source.export_entities();
    assert_eq!(records.len(), 50);

    let mut target = SimulationEngine::new(quiet_config());
    assert_eq!(target.restore_entities(&records), 50);
    assert_eq!(target.export_entities(), records);
}
