//! Modify-surfaces tool mode: converts walls into climbable surfaces and
//! floors into trampolines, with a bounded ledger of active conversions.

use engine_core::{Tint, Transform, Vec3, World};
use hecs::Entity;
use physics::{ColliderHandle, PhysicsWorld};
use std::collections::VecDeque;

use crate::events::{EventQueue, GameEvent};
use crate::surfaces::SurfaceBehavior;
use crate::world::{ColliderMap, SurfaceKind};

/// Tuning for the modify-surfaces handler.
#[derive(Debug, Clone)]
pub struct ModifySurfacesConfig {
    /// Maximum simultaneously modified surfaces.
    pub max_active_surfaces: usize,
    /// Marker color for converted walls.
    pub wall_color: Vec3,
    /// Marker color for converted floors.
    pub floor_color: Vec3,
    /// Bounce multiplier granted to converted floors.
    pub bounce_multiplier: f32,
    /// Tool ray range.
    pub ray_range: f32,
    /// How far the climb trigger region extends past the wall's extents.
    pub region_padding: f32,
}

impl Default for ModifySurfacesConfig {
    fn default() -> Self {
        Self {
            max_active_surfaces: 3,
            wall_color: Vec3::new(1.0, 0.2, 0.2),
            floor_color: Vec3::new(0.2, 1.0, 0.2),
            bounce_multiplier: 2.0,
            ray_range: 50.0,
            region_padding: 0.25,
        }
    }
}

/// One active surface conversion.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceModEntry {
    pub entity: Entity,
    /// The surface's solid collider (ground probes report this).
    pub collider: ColliderHandle,
    pub original_tint: Vec3,
    pub behavior: SurfaceBehavior,
}

/// Bounded FIFO of active surface conversions. Exceeding the limit evicts
/// and restores the oldest. The locomotion controller reads this to learn
/// which regions are climbable and which floors bounce.
#[derive(Debug)]
pub struct SurfaceLedger {
    entries: VecDeque<SurfaceModEntry>,
    max: usize,
}

impl SurfaceLedger {
    pub fn new(max: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entries.iter().any(|e| e.entity == entity)
    }

    /// Whether this sensor collider is a climb trigger region.
    pub fn is_climb_region(&self, collider: ColliderHandle) -> bool {
        self.entries
            .iter()
            .any(|e| e.behavior.region() == Some(collider))
    }

    /// Bounce multiplier of a surface, looked up by its solid collider.
    pub fn bounce_multiplier(&self, collider: ColliderHandle) -> Option<f32> {
        self.entries.iter().find_map(|e| match e.behavior {
            SurfaceBehavior::Bouncy { multiplier } if e.collider == collider => Some(multiplier),
            _ => None,
        })
    }

    /// Enqueue a conversion; returns the evicted oldest entry when full.
    fn push(&mut self, entry: SurfaceModEntry) -> Option<SurfaceModEntry> {
        self.entries.push_back(entry);
        if self.entries.len() > self.max {
            self.entries.pop_front()
        } else {
            None
        }
    }
}

/// The modify-surfaces tool mode.
pub struct ModifySurfacesHandler {
    config: ModifySurfacesConfig,
    ledger: SurfaceLedger,
}

impl ModifySurfacesHandler {
    pub fn new(config: ModifySurfacesConfig) -> Self {
        let max = config.max_active_surfaces;
        Self {
            config,
            ledger: SurfaceLedger::new(max),
        }
    }

    pub fn ledger(&self) -> &SurfaceLedger {
        &self.ledger
    }

    /// Fire entry point: convert whatever surface the tool ray hits.
    /// Misses, unclassified surfaces, and re-selections are all no-ops.
    pub fn modify_surface(
        &mut self,
        tool: &Transform,
        world: &mut World,
        physics: &mut PhysicsWorld,
        colliders: &ColliderMap,
        events: &mut EventQueue,
    ) {
        let Some(hit) = physics.raycast(tool.position, tool.forward(), self.config.ray_range)
        else {
            return;
        };
        let Some(entity) = colliders.entity(hit.collider) else {
            return;
        };
        if self.ledger.contains(entity) {
            return;
        }
        let Ok(kind) = world.get::<&SurfaceKind>(entity).map(|k| *k) else {
            // Unclassified geometry stays untouched so the color-restore
            // ledger can never hold an entry we cannot revert.
            return;
        };

        let Ok(mut tint) = world.get::<&mut Tint>(entity) else {
            log::warn!("Surface {:?} has no tint; cannot mark it", entity);
            return;
        };
        let original = tint.rgb;

        let behavior = match kind {
            SurfaceKind::Wall => {
                tint.rgb = self.config.wall_color;
                drop(tint);
                let center = physics
                    .collider_translation(hit.collider)
                    .unwrap_or(hit.point);
                let half = physics
                    .cuboid_half_extents(hit.collider)
                    .unwrap_or(Vec3::splat(1.0))
                    + Vec3::splat(self.config.region_padding);
                let region = physics.add_sensor_cuboid(center, half);
                SurfaceBehavior::Climbable { region }
            }
            SurfaceKind::Floor => {
                tint.rgb = self.config.floor_color;
                drop(tint);
                SurfaceBehavior::Bouncy {
                    multiplier: self.config.bounce_multiplier,
                }
            }
        };

        let evicted = self.ledger.push(SurfaceModEntry {
            entity,
            collider: hit.collider,
            original_tint: original,
            behavior,
        });
        events.push(GameEvent::SurfaceModified {
            surface: entity,
            kind,
        });

        if let Some(old) = evicted {
            revert(&old, world, physics);
            events.push(GameEvent::SurfaceReverted(old.entity));
        }
    }
}

/// Restore a surface to its pre-conversion state: original color back,
/// behavior gone, trigger region destroyed.
fn revert(entry: &SurfaceModEntry, world: &mut World, physics: &mut PhysicsWorld) {
    if let Ok(mut tint) = world.get::<&mut Tint>(entry.entity) {
        tint.rgb = entry.original_tint;
    }
    if let Some(region) = entry.behavior.region() {
        physics.remove_collider(region);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Quat;

    struct Fixture {
        world: World,
        physics: PhysicsWorld,
        colliders: ColliderMap,
        events: EventQueue,
        handler: ModifySurfacesHandler,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                world: World::new(),
                physics: PhysicsWorld::new(),
                colliders: ColliderMap::new(),
                events: EventQueue::new(),
                handler: ModifySurfacesHandler::new(ModifySurfacesConfig::default()),
            }
        }

        fn spawn_surface(&mut self, kind: SurfaceKind, position: Vec3) -> Entity {
            let collider = self.physics.add_static_cuboid(position, Vec3::splat(1.0));
            let entity = self.world.spawn((kind, Tint::new(Vec3::splat(0.5))));
            self.colliders.insert(collider, entity);
            entity
        }

        /// Tool one meter in front of the surface, looking straight at it.
        fn aim_at(&mut self, position: Vec3) -> Transform {
            self.physics.update_query_pipeline();
            Transform::from_position_rotation(position + Vec3::new(0.0, 0.0, 5.0), Quat::IDENTITY)
        }

        fn modify(&mut self, aim: Vec3) {
            let tool = self.aim_at(aim);
            self.handler.modify_surface(
                &tool,
                &mut self.world,
                &mut self.physics,
                &self.colliders,
                &mut self.events,
            );
        }
    }

    #[test]
    fn wall_becomes_climbable_and_recolored() {
        let mut f = Fixture::new();
        let wall = f.spawn_surface(SurfaceKind::Wall, Vec3::new(0.0, 0.0, -3.0));
        f.modify(Vec3::new(0.0, 0.0, -3.0));

        assert_eq!(f.handler.ledger().len(), 1);
        let tint = f.world.get::<&Tint>(wall).unwrap();
        assert_eq!(tint.rgb, ModifySurfacesConfig::default().wall_color);
        // The new trigger region is known to the ledger.
        let entry = f.handler.ledger.entries[0];
        assert!(entry.behavior.is_climbable());
        assert!(f.handler.ledger().is_climb_region(entry.behavior.region().unwrap()));
    }

    #[test]
    fn floor_becomes_bouncy() {
        let mut f = Fixture::new();
        f.spawn_surface(SurfaceKind::Floor, Vec3::new(0.0, 0.0, -3.0));
        f.modify(Vec3::new(0.0, 0.0, -3.0));

        let entry = f.handler.ledger.entries[0];
        assert!(entry.behavior.is_bouncy());
        assert_eq!(f.handler.ledger().bounce_multiplier(entry.collider), Some(2.0));
    }

    #[test]
    fn reselecting_a_tracked_surface_is_a_no_op() {
        let mut f = Fixture::new();
        f.spawn_surface(SurfaceKind::Wall, Vec3::new(0.0, 0.0, -3.0));
        f.modify(Vec3::new(0.0, 0.0, -3.0));
        f.modify(Vec3::new(0.0, 0.0, -3.0));

        assert_eq!(f.handler.ledger().len(), 1);
        assert_eq!(f.events.drain().len(), 1);
    }

    #[test]
    fn overflow_evicts_oldest_and_restores_it_exactly() {
        let mut f = Fixture::new();
        let first = f.spawn_surface(SurfaceKind::Wall, Vec3::new(0.0, 0.0, -3.0));
        f.modify(Vec3::new(0.0, 0.0, -3.0));
        let first_region = f.handler.ledger.entries[0].behavior.region().unwrap();

        // Fill the remaining slots, then one more to force eviction.
        for i in 1..=3 {
            let x = i as f32 * 10.0;
            f.spawn_surface(SurfaceKind::Floor, Vec3::new(x, 0.0, -3.0));
            f.modify(Vec3::new(x, 0.0, -3.0));
        }

        assert_eq!(f.handler.ledger().len(), 3);
        assert!(!f.handler.ledger().contains(first));
        let tint = f.world.get::<&Tint>(first).unwrap();
        assert_eq!(tint.rgb, Vec3::splat(0.5));
        assert!(!f.handler.ledger().is_climb_region(first_region));
        let events = f.events.drain();
        assert!(events.contains(&GameEvent::SurfaceReverted(first)));
    }

    #[test]
    fn ray_miss_and_unclassified_surfaces_are_ignored() {
        let mut f = Fixture::new();
        // Nothing in the world: miss.
        f.modify(Vec3::new(0.0, 0.0, -3.0));
        assert!(f.handler.ledger().is_empty());

        // A collider with no SurfaceKind: ignored.
        let collider = f.physics.add_static_cuboid(Vec3::new(0.0, 0.0, -3.0), Vec3::splat(1.0));
        let entity = f.world.spawn((Tint::default(),));
        f.colliders.insert(collider, entity);
        f.modify(Vec3::new(0.0, 0.0, -3.0));
        assert!(f.handler.ledger().is_empty());
        assert!(f.events.drain().is_empty());
    }
}
