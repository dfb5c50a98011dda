//! Blaster tool mode: hold fire to charge, release to launch a projectile
//! whose size, speed, and damage scale with the charge.

use engine_core::{Lifetime, Transform, Vec3, World};
use hecs::Entity;
use physics::{PhysicsBody, PhysicsWorld};

use crate::object_pool::{ProjectilePool, PROJECTILE_BASE_RADIUS};
use crate::projectile::Projectile;

/// Tuning for the blaster handler.
#[derive(Debug, Clone)]
pub struct BlasterConfig {
    /// Seconds of charge for a maximum-power shot.
    pub max_charge_time: f32,
    /// Projectile scale at zero charge.
    pub min_projectile_size: f32,
    /// Projectile scale at full charge.
    pub max_projectile_size: f32,
    /// Launch speed at zero charge.
    pub min_projectile_speed: f32,
    /// Launch speed at full charge.
    pub max_projectile_speed: f32,
    /// Impact damage at zero charge.
    pub min_damage: f32,
    /// Impact damage at full charge.
    pub max_damage: f32,
    /// How far in front of the tool the projectile charges.
    pub muzzle_offset: f32,
}

impl Default for BlasterConfig {
    fn default() -> Self {
        Self {
            max_charge_time: 2.0,
            min_projectile_size: 1.5,
            max_projectile_size: 4.5,
            min_projectile_speed: 40.0,
            max_projectile_speed: 60.0,
            min_damage: 10.0,
            max_damage: 30.0,
            muzzle_offset: 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Charge {
    entity: Entity,
    time: f32,
}

/// The blaster tool mode.
pub struct BlasterHandler {
    config: BlasterConfig,
    charging: Option<Charge>,
}

impl BlasterHandler {
    pub fn new(config: BlasterConfig) -> Self {
        Self {
            config,
            charging: None,
        }
    }

    /// Normalized charge progress, while a charge is active.
    pub fn charge_percentage(&self) -> Option<f32> {
        self.charging
            .map(|c| (c.time / self.config.max_charge_time).clamp(0.0, 1.0))
    }

    /// Fire entry point: begin charging. The projectile appears at the
    /// muzzle immediately — visible, kinematic, minimum size. A second
    /// call while already charging is absorbed without resetting the
    /// accumulated charge.
    pub fn start_charging(
        &mut self,
        tool: &Transform,
        world: &mut World,
        physics: &mut PhysicsWorld,
        pool: &mut ProjectilePool,
    ) {
        if self.charging.is_some() {
            return;
        }

        let muzzle = tool.position + tool.forward() * self.config.muzzle_offset;
        let entity = pool.acquire(world, physics, muzzle, tool.rotation);
        self.apply_size(entity, self.config.min_projectile_size, world, physics);
        self.charging = Some(Charge { entity, time: 0.0 });
    }

    /// Per-frame work while this mode is active: grow the charging
    /// projectile and keep it at the muzzle.
    pub fn update(
        &mut self,
        tool: &Transform,
        world: &mut World,
        physics: &mut PhysicsWorld,
        dt: f32,
    ) {
        let Some(mut charge) = self.charging else {
            return;
        };
        charge.time += dt;
        self.charging = Some(charge);

        let pct = self.charge_percentage().unwrap_or(0.0);
        let size = lerp(
            self.config.min_projectile_size,
            self.config.max_projectile_size,
            pct,
        );
        self.apply_size(charge.entity, size, world, physics);

        let muzzle = tool.position + tool.forward() * self.config.muzzle_offset;
        if let Ok(body) = world.get::<&PhysicsBody>(charge.entity).map(|b| b.rigid_body) {
            physics.set_translation(body, muzzle);
        }
    }

    /// Release entry point: finalize size/speed/damage from the charge
    /// and launch. No-op when nothing was charging.
    pub fn fire_charged_shot(
        &mut self,
        tool: &Transform,
        world: &mut World,
        physics: &mut PhysicsWorld,
    ) {
        let Some(charge) = self.charging.take() else {
            return;
        };
        let pct = (charge.time / self.config.max_charge_time).clamp(0.0, 1.0);

        let size = lerp(
            self.config.min_projectile_size,
            self.config.max_projectile_size,
            pct,
        );
        let speed = lerp(
            self.config.min_projectile_speed,
            self.config.max_projectile_speed,
            pct,
        );
        self.apply_size(charge.entity, size, world, physics);

        if let Ok(body) = world.get::<&PhysicsBody>(charge.entity).map(|b| b.rigid_body) {
            physics.set_kinematic(body, false);
            physics.set_linvel(body, tool.forward() * speed);
        }
        if let Ok(mut projectile) = world.get::<&mut Projectile>(charge.entity) {
            projectile.damage = lerp(self.config.min_damage, self.config.max_damage, pct);
            projectile.in_flight = true;
        }
        if let Ok(mut lifetime) = world.get::<&mut Lifetime>(charge.entity) {
            lifetime.remaining = Projectile::LIFETIME_SECONDS;
        }
    }

    fn apply_size(&self, entity: Entity, size: f32, world: &mut World, physics: &mut PhysicsWorld) {
        if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
            transform.scale = Vec3::splat(size);
        }
        if let Ok(collider) = world.get::<&PhysicsBody>(entity).map(|b| b.collider) {
            if let Some(collider) = collider {
                physics.set_ball_radius(collider, PROJECTILE_BASE_RADIUS * size);
            }
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
