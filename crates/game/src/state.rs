//! Game state: ownership of the world, physics, player, tool, and event
//! queue, plus the arena spawn helpers the demo and tests build with.

use engine_core::{Health, Time, Tint, Transform, Vec3, World};
use hecs::Entity;
use input::InputState;
use physics::{CollisionGroup, PhysicsBody, PhysicsWorld};

use crate::arm_cannon::{ArmCannon, ArmCannonConfig};
use crate::config::GameConfig;
use crate::events::{EventQueue, GameEvent};
use crate::locomotion::{LocomotionConfig, PlayerLocomotion};
use crate::object_pool::ProjectilePool;
use crate::world::{ColliderMap, Movable, SurfaceKind};

/// Everything the game loop owns. Collaborators are explicit fields; the
/// update functions destructure this rather than reaching for globals.
pub struct GameState {
    pub config: GameConfig,
    pub world: World,
    pub physics: PhysicsWorld,
    pub colliders: ColliderMap,
    pub input: InputState,
    pub time: Time,
    pub player: PlayerLocomotion,
    pub arm_cannon: ArmCannon,
    pub pool: ProjectilePool,
    pub events: EventQueue,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        let mut physics = PhysicsWorld::new();

        let locomotion_config = LocomotionConfig {
            toggle_crouch: config.toggle_crouch,
            look_sensitivity: 0.002 * config.sensitivity,
            ..LocomotionConfig::default()
        };
        let player = PlayerLocomotion::new(locomotion_config, &mut physics, Vec3::new(0.0, 1.1, 0.0));

        let mut time = Time::new();
        time.set_fixed_rate(config.fixed_rate_hz);

        Self {
            config,
            world: World::new(),
            physics,
            colliders: ColliderMap::new(),
            input: InputState::new(),
            time,
            player,
            arm_cannon: ArmCannon::new(ArmCannonConfig::default()),
            pool: ProjectilePool::new(),
            events: EventQueue::new(),
        }
    }

    /// The tool/eye transform: player eye position looking along yaw and
    /// pitch. Raycast-driven tool modes fire from here.
    pub fn tool_transform(&self) -> Transform {
        let base = self
            .physics
            .body_translation(self.player.body)
            .unwrap_or(Vec3::ZERO);
        Transform::from_yaw_pitch(
            base + Vec3::Y * self.player.eye_height_offset,
            self.player.yaw,
            self.player.pitch,
        )
    }

    /// Run one frame: frame-domain systems, then drain due fixed steps.
    pub fn update(&mut self) {
        crate::update::frame(self);
    }

    /// Take every pending outward event.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    // ── Arena construction ─────────────────────────────────────────────────

    /// Flat ground collider spanning the arena, plus a floor entity for
    /// classification so it can be made bouncy.
    pub fn spawn_ground(&mut self) -> Entity {
        self.physics.add_ground_plane();
        // A thin classified slab sitting just above the safety plane; rays
        // and probes resolve to this, and it is what the modify tool
        // converts.
        self.spawn_surface(
            SurfaceKind::Floor,
            Vec3::new(0.0, -0.04, 0.0),
            Vec3::new(40.0, 0.05, 40.0),
            Vec3::splat(0.4),
        )
    }

    /// Spawn a classified static surface (wall or floor slab).
    pub fn spawn_surface(
        &mut self,
        kind: SurfaceKind,
        position: Vec3,
        half_extents: Vec3,
        color: Vec3,
    ) -> Entity {
        let collider = self.physics.add_static_cuboid(position, half_extents);
        let entity = self.world.spawn((
            Transform::from_position(position),
            Tint::new(color),
            kind,
        ));
        self.colliders.insert(collider, entity);
        entity
    }

    /// Spawn a grabbable crate.
    pub fn spawn_movable_crate(&mut self, position: Vec3, half_extent: f32) -> Entity {
        let body = self.physics.add_dynamic_body(position);
        let collider = self.physics.add_box_collider(
            body,
            Vec3::splat(half_extent),
            CollisionGroup::movable(),
        );
        let entity = self.world.spawn((
            Transform::from_position(position),
            Tint::new(Vec3::new(0.8, 0.6, 0.4)),
            Movable,
            PhysicsBody::with_collider(body, collider),
        ));
        self.colliders.insert(collider, entity);
        entity
    }

    /// Spawn a damageable practice target.
    pub fn spawn_target(&mut self, position: Vec3, health: f32) -> Entity {
        let collider = self.physics.add_static_cuboid(position, Vec3::splat(0.75));
        let entity = self.world.spawn((
            Transform::from_position(position),
            Tint::new(Vec3::new(0.9, 0.9, 0.2)),
            Health::new(health),
        ));
        self.colliders.insert(collider, entity);
        entity
    }
}
