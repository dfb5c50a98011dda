//! Projectile flight: lifetime countdown, impact damage, pool return.

use engine_core::{Health, Lifetime, Transform, World};
use hecs::Entity;
use physics::{PhysicsBody, PhysicsWorld};

use crate::events::{EventQueue, GameEvent};
use crate::object_pool::ProjectilePool;
use crate::world::ColliderMap;

/// Component on every pooled projectile entity.
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    /// Damage applied to whatever it hits (set at fire time from charge).
    pub damage: f32,
    /// True from fire until impact/expiry. Parked pool instances are not
    /// in flight.
    pub in_flight: bool,
}

impl Projectile {
    /// Seconds a shot survives without hitting anything.
    pub const LIFETIME_SECONDS: f32 = 5.0;
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            damage: 10.0,
            in_flight: false,
        }
    }
}

/// Advance every in-flight projectile by one fixed step. Runs after the
/// physics step so contact pairs are fresh. Impacts damage the target's
/// `Health` (if it has one) and return the instance to the pool.
pub fn update_projectiles(
    world: &mut World,
    physics: &mut PhysicsWorld,
    colliders: &ColliderMap,
    pool: &mut ProjectilePool,
    events: &mut EventQueue,
    dt: f32,
) {
    // (projectile, collider it hit or None for expiry)
    let mut finished: Vec<(Entity, Option<physics::ColliderHandle>)> = Vec::new();

    for (entity, (projectile, lifetime, body, transform)) in world
        .query::<(&Projectile, &mut Lifetime, &PhysicsBody, &mut Transform)>()
        .iter()
    {
        if !projectile.in_flight {
            continue;
        }

        // Keep the render transform in sync with the body.
        if let Some(pos) = physics.body_translation(body.rigid_body) {
            transform.position = pos;
        }

        if lifetime.update(dt) {
            finished.push((entity, None));
            continue;
        }

        if let Some(collider) = body.collider {
            if let Some(other) = physics.first_contact(collider) {
                finished.push((entity, Some(other)));
            }
        }
    }

    for (entity, hit) in finished {
        let target = hit.and_then(|c| colliders.entity(c));

        if hit.is_some() {
            let damage = world
                .get::<&Projectile>(entity)
                .map(|p| p.damage)
                .unwrap_or(0.0);
            if let Some(target_entity) = target {
                if let Ok(mut health) = world.get::<&mut Health>(target_entity) {
                    health.take_damage(damage);
                    events.push(GameEvent::Damaged {
                        entity: target_entity,
                        amount: damage,
                    });
                }
            }
            events.push(GameEvent::ProjectileImpact { target });
        }

        if let Ok(mut projectile) = world.get::<&mut Projectile>(entity) {
            projectile.in_flight = false;
        }
        if let Ok(mut lifetime) = world.get::<&mut Lifetime>(entity) {
            lifetime.remaining = Projectile::LIFETIME_SECONDS;
        }
        pool.release(world, physics, entity);
    }
}
