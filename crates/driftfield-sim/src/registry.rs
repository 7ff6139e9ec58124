//! Authoritative entity collection, kept in lockstep with the spatial index.
//!
//! Every live entity in the hecs world is registered in the index under its
//! fixed radius; collecting an entity removes it from the index at once, and
//! the next tick's sweep despawns it and spawns a replacement.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use driftfield_core::components::{Collectible, Payload};
use driftfield_core::config::{SpawnWeights, WorldConfig};
use driftfield_core::constants::*;
use driftfield_core::enums::{Category, ItemKind};
use driftfield_core::types::{Position, WorldBounds};
use driftfield_pilot::targeting::Candidate;

use crate::context::InteractionContext;
use crate::interaction;
use crate::proximity::collides;
use crate::spatial::SpatialIndex;

/// Items a recovered container may hold.
const PAYLOAD_POOL: [ItemKind; 4] = [
    ItemKind::Components,
    ItemKind::Ore,
    ItemKind::Crystal,
    ItemKind::Salvage,
];

/// Counts from one registry tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub swept: usize,
    pub spawned: usize,
    /// Deficit left after spawn attempts were exhausted; retried next tick.
    pub spawn_failures: usize,
    pub contacts: usize,
    pub collected: usize,
}

/// Where new entities may appear.
#[derive(Debug, Clone)]
struct SpawnRules {
    bounds: WorldBounds,
    home_base: Position,
    protected_radius: f64,
    spawn_clearance: f64,
    weights: SpawnWeights,
}

pub struct EntityRegistry {
    world: World,
    index: SpatialIndex<Entity>,
    rules: SpawnRules,
    target_population: usize,
}

impl EntityRegistry {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            world: World::new(),
            index: SpatialIndex::new(config.cell_size),
            rules: SpawnRules {
                bounds: config.bounds(),
                home_base: config.home_base,
                protected_radius: config.protected_radius,
                spawn_clearance: config.spawn_clearance,
                weights: config.spawn_weights,
            },
            target_population: config.target_population,
        }
    }

    /// Drop everything and populate `target_count` entities outside the
    /// protected zone. Returns how many were placed.
    pub fn initialize(&mut self, target_count: usize, rng: &mut ChaCha8Rng) -> usize {
        self.clear();
        self.target_population = target_count;
        let mut placed = 0;
        for _ in 0..target_count {
            if self.spawn_random(rng, None).is_some() {
                placed += 1;
            }
        }
        if placed < target_count {
            log::debug!("initial spawn placed {placed}/{target_count}");
        }
        log::info!(
            "entity registry initialized: {placed} entities, {} cells",
            self.index.cell_count()
        );
        placed
    }

    pub fn clear(&mut self) {
        self.world.clear();
        self.index.clear();
    }

    /// Sweep, backfill and (unless the ship is a ghost) resolve contacts.
    pub fn tick(&mut self, ctx: &mut InteractionContext<'_>) -> TickReport {
        let observer = ctx.observer();
        let mut report = TickReport {
            swept: self.sweep(),
            ..Default::default()
        };

        let deficit = self.target_population.saturating_sub(self.world.len() as usize);
        for _ in 0..deficit {
            let avoid = Some((observer.position, self.rules.spawn_clearance));
            match self.spawn_random(ctx.rng, avoid) {
                Some(_) => report.spawned += 1,
                None => report.spawn_failures += 1,
            }
        }
        if report.spawn_failures > 0 {
            log::debug!(
                "backfill: {} spawn(s) exhausted {MAX_SPAWN_ATTEMPTS} attempts, retrying next tick",
                report.spawn_failures
            );
        }

        if ctx.ship.ghost {
            return report;
        }

        let ship_pos = ctx.ship.position;
        let ship_radius = ctx.ship.collision_radius;
        let hits: Vec<Entity> = self
            .index
            .query(ship_pos.x, ship_pos.y, observer.scan_radius + MAX_ENTITY_RADIUS)
            .into_iter()
            .filter(|&e| match self.entry(e) {
                Some((pos, c)) => !c.collected && collides(&ship_pos, ship_radius, &pos, c.radius),
                None => false,
            })
            .collect();

        for entity in hits {
            let Some((_, collectible)) = self.entry(entity) else {
                continue;
            };
            if collectible.collected {
                continue;
            }
            let payload = self.world.get::<&Payload>(entity).ok().map(|p| (*p).clone());
            report.contacts += 1;
            if interaction::dispatch(ctx, collectible.category, payload.as_ref()) {
                self.mark_collected(entity);
                report.collected += 1;
            }
        }
        report
    }

    /// Pass-through proximity query. Collected entities are already out of
    /// the index and never appear.
    pub fn query(&self, x: f64, y: f64, range: f64) -> Vec<Entity> {
        self.index.query(x, y, range)
    }

    /// Query results as autopilot candidates, in index order.
    pub fn candidates(&self, center: &Position, range: f64) -> Vec<Candidate<Entity>> {
        self.query(center.x, center.y, range)
            .into_iter()
            .filter_map(|id| {
                self.entry(id).map(|(position, c)| Candidate {
                    id,
                    position,
                    category: c.category,
                    collected: c.collected,
                })
            })
            .collect()
    }

    /// Flag an entity as collected and drop it from the index. Idempotent.
    pub fn mark_collected(&mut self, entity: Entity) {
        let Ok((pos, collectible)) = self
            .world
            .query_one_mut::<(&Position, &mut Collectible)>(entity)
        else {
            return;
        };
        if collectible.collected {
            return;
        }
        collectible.collected = true;
        self.index.remove(entity, pos, collectible.radius);
    }

    /// Position and collectible data for a live entity.
    pub fn entry(&self, entity: Entity) -> Option<(Position, Collectible)> {
        let mut query = self.world.query_one::<(&Position, &Collectible)>(entity).ok()?;
        let (pos, collectible) = query.get()?;
        Some((*pos, *collectible))
    }

    pub fn get(&self, entity: Entity) -> Option<Collectible> {
        self.entry(entity).map(|(_, c)| c)
    }

    /// Every entity in the world, sorted by id.
    pub fn entities(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .world
            .query::<&Collectible>()
            .iter()
            .map(|(e, _)| e)
            .collect();
        entities.sort_unstable();
        entities
    }

    /// Entities not yet collected.
    pub fn live_count(&self) -> usize {
        self.world
            .query::<&Collectible>()
            .iter()
            .filter(|(_, c)| !c.collected)
            .count()
    }

    /// Entities in the world, including any collected but not yet swept.
    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    pub fn target_population(&self) -> usize {
        self.target_population
    }

    pub fn index(&self) -> &SpatialIndex<Entity> {
        &self.index
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Place a specific entity. Cargo gets an empty payload; see
    /// [`EntityRegistry::spawn_with_payload`].
    pub fn spawn_at(&mut self, category: Category, position: Position) -> Entity {
        self.spawn_with_payload(category, position, Vec::new())
    }

    pub fn spawn_with_payload(
        &mut self,
        category: Category,
        position: Position,
        items: Vec<ItemKind>,
    ) -> Entity {
        let collectible = Collectible::new(category);
        let entity = if category == Category::RecoveryCargo {
            self.world.spawn((position, collectible, Payload { items }))
        } else {
            self.world.spawn((position, collectible))
        };
        self.index.insert(entity, &position, collectible.radius);
        entity
    }

    /// Despawn collected entities. Returns how many were removed.
    fn sweep(&mut self) -> usize {
        let mut collected: Vec<(Entity, Position, f64)> = self
            .world
            .query::<(&Position, &Collectible)>()
            .iter()
            .filter(|(_, (_, c))| c.collected)
            .map(|(e, (p, c))| (e, *p, c.radius))
            .collect();
        collected.sort_unstable_by_key(|(e, _, _)| *e);

        for &(entity, pos, radius) in &collected {
            // Already out of the index unless flagged behind our back.
            self.index.remove(entity, &pos, radius);
            let _ = self.world.despawn(entity);
        }
        collected.len()
    }

    /// One rejection-sampled spawn. `avoid` keeps the point at least that far
    /// from a position (the observer during backfill).
    fn spawn_random(&mut self, rng: &mut ChaCha8Rng, avoid: Option<(Position, f64)>) -> Option<Entity> {
        let category = self.roll_category(rng);
        let position = self.sample_position(rng, avoid)?;
        let items = if category == Category::RecoveryCargo {
            let count = rng.gen_range(1..=CARGO_MAX_PAYLOAD);
            (0..count)
                .map(|_| PAYLOAD_POOL[rng.gen_range(0..PAYLOAD_POOL.len())])
                .collect()
        } else {
            Vec::new()
        };
        Some(self.spawn_with_payload(category, position, items))
    }

    fn roll_category(&self, rng: &mut ChaCha8Rng) -> Category {
        let total = self.rules.weights.total_weight();
        if total == 0 {
            return Category::Ordinary;
        }
        self.rules.weights.category_for(rng.gen_range(0..total))
    }

    fn sample_position(&self, rng: &mut ChaCha8Rng, avoid: Option<(Position, f64)>) -> Option<Position> {
        let rules = &self.rules;
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let p = Position::new(
                rng.gen_range(0.0..=rules.bounds.width),
                rng.gen_range(0.0..=rules.bounds.height),
            );
            if p.distance_to(&rules.home_base) < rules.protected_radius {
                continue;
            }
            if let Some((center, clearance)) = avoid {
                if p.distance_to(&center) < clearance {
                    continue;
                }
            }
            return Some(p);
        }
        None
    }
}
