//! Reusable projectile instance pool.
//!
//! Firing allocates nothing in the steady state: released projectiles are
//! parked (hidden, kinematic, far below the arena) and handed back out on
//! the next acquire. The pool only grows; an instance is either in the
//! free queue or active in the world, never both.

use engine_core::{Lifetime, Quat, Tint, Transform, Vec3, Visibility, World};
use hecs::Entity;
use physics::{CollisionGroup, PhysicsBody, PhysicsWorld};
use std::collections::VecDeque;

use crate::projectile::Projectile;

/// Where parked instances sit, safely out of raycast and probe range.
const PARK_POSITION: Vec3 = Vec3::new(0.0, -500.0, 0.0);

/// Collider radius of an unscaled projectile.
pub const PROJECTILE_BASE_RADIUS: f32 = 0.1;

/// Grow-only cache of projectile entities.
pub struct ProjectilePool {
    free: VecDeque<Entity>,
    spawned: usize,
}

impl Default for ProjectilePool {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self {
            free: VecDeque::new(),
            spawned: 0,
        }
    }

    /// Take an instance out of the pool, repositioned and visible but
    /// kinematic (charging projectiles sit at the muzzle unaffected by
    /// physics). Spawns a fresh instance if the free queue is empty.
    pub fn acquire(
        &mut self,
        world: &mut World,
        physics: &mut PhysicsWorld,
        position: Vec3,
        rotation: Quat,
    ) -> Entity {
        let entity = match self.free.pop_front() {
            Some(entity) => entity,
            None => self.spawn_instance(world, physics),
        };

        if let Ok(body) = world.get::<&PhysicsBody>(entity) {
            let handle = body.rigid_body;
            drop(body);
            physics.set_kinematic(handle, true);
            physics.set_translation(handle, position);
            physics.set_linvel(handle, Vec3::ZERO);
        }
        if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
            transform.position = position;
            transform.rotation = rotation;
        }
        if let Ok(mut visibility) = world.get::<&mut Visibility>(entity) {
            visibility.visible = true;
        }

        entity
    }

    /// Return an active instance: hidden, parked kinematic, re-enqueued.
    pub fn release(&mut self, world: &mut World, physics: &mut PhysicsWorld, entity: Entity) {
        debug_assert!(!self.free.contains(&entity));

        if let Ok(body) = world.get::<&PhysicsBody>(entity) {
            let handle = body.rigid_body;
            drop(body);
            physics.set_linvel(handle, Vec3::ZERO);
            physics.set_kinematic(handle, true);
            physics.set_translation(handle, PARK_POSITION);
        }
        if let Ok(mut visibility) = world.get::<&mut Visibility>(entity) {
            visibility.visible = false;
        }

        self.free.push_back(entity);
    }

    fn spawn_instance(&mut self, world: &mut World, physics: &mut PhysicsWorld) -> Entity {
        let body = physics.add_dynamic_body(PARK_POSITION);
        let collider =
            physics.add_sphere_collider(body, PROJECTILE_BASE_RADIUS, CollisionGroup::projectile());
        physics.set_kinematic(body, true);

        self.spawned += 1;
        world.spawn((
            Transform::from_position(PARK_POSITION),
            Tint::default(),
            Visibility::hidden(),
            Projectile::default(),
            Lifetime::new(Projectile::LIFETIME_SECONDS),
            PhysicsBody::with_collider(body, collider),
        ))
    }

    /// Instances currently waiting in the free queue.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total instances ever created by this pool.
    pub fn spawned_count(&self) -> usize {
        self.spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (World, PhysicsWorld, ProjectilePool) {
        (World::new(), PhysicsWorld::new(), ProjectilePool::new())
    }

    #[test]
    fn acquire_from_empty_pool_grows_it() {
        let (mut world, mut physics, mut pool) = setup();
        let a = pool.acquire(&mut world, &mut physics, Vec3::ZERO, Quat::IDENTITY);
        assert_eq!(pool.spawned_count(), 1);
        assert_eq!(pool.free_count(), 0);

        // Second acquire without a release must spawn a distinct instance.
        let b = pool.acquire(&mut world, &mut physics, Vec3::ZERO, Quat::IDENTITY);
        assert_ne!(a, b);
        assert_eq!(pool.spawned_count(), 2);
    }

    #[test]
    fn release_then_acquire_reuses_the_instance() {
        let (mut world, mut physics, mut pool) = setup();
        let a = pool.acquire(&mut world, &mut physics, Vec3::ZERO, Quat::IDENTITY);
        pool.release(&mut world, &mut physics, a);
        assert_eq!(pool.free_count(), 1);

        let b = pool.acquire(&mut world, &mut physics, Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);
        assert_eq!(a, b);
        assert_eq!(pool.spawned_count(), 1);
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn released_instance_is_hidden_and_parked() {
        let (mut world, mut physics, mut pool) = setup();
        let e = pool.acquire(&mut world, &mut physics, Vec3::new(0.0, 2.0, 0.0), Quat::IDENTITY);
        assert!(world.get::<&Visibility>(e).unwrap().visible);

        pool.release(&mut world, &mut physics, e);
        assert!(!world.get::<&Visibility>(e).unwrap().visible);
        let body = world.get::<&PhysicsBody>(e).unwrap().rigid_body;
        assert!(physics.body_translation(body).unwrap().y < -100.0);
        assert!(physics.is_kinematic(body));
    }

    #[test]
    fn acquired_instance_sits_at_requested_position() {
        let (mut world, mut physics, mut pool) = setup();
        let pos = Vec3::new(3.0, 1.5, -2.0);
        let e = pool.acquire(&mut world, &mut physics, pos, Quat::IDENTITY);
        let body = world.get::<&PhysicsBody>(e).unwrap().rigid_body;
        assert!((physics.body_translation(body).unwrap() - pos).length() < 1e-5);
        assert!(physics.is_kinematic(body));
    }
}
