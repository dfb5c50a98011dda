//! Move-objects tool mode: grab a physical body, float it along the tool
//! ray, rotate it in place, and keep a bounded history of released bodies
//! frozen where the player parked them.

use engine_core::{Quat, Tint, Transform, Vec2, Vec3, World};
use hecs::Entity;
use input::InputState;
use physics::{PhysicsBody, PhysicsWorld, RigidBodyHandle};
use std::collections::{HashMap, HashSet, VecDeque};

use crate::locomotion::PlayerLocomotion;
use crate::world::{ColliderMap, Movable};

/// Tuning for the move-objects handler.
#[derive(Debug, Clone)]
pub struct MoveObjectsConfig {
    /// Hold distance change per unit of axis input, per second.
    pub move_speed: f32,
    /// Held-object rotation speed, radians per pointer unit per second.
    pub rotate_speed: f32,
    /// Closest the held object may float.
    pub min_hold_distance: f32,
    /// Farthest the held object may float.
    pub max_hold_distance: f32,
    /// Grab ray range.
    pub ray_range: f32,
    /// Released-object history ring size.
    pub max_stored_objects: usize,
    /// Marker color for ring entries.
    pub queued_color: Vec3,
}

impl Default for MoveObjectsConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rotate_speed: 1.6,
            min_hold_distance: 1.0,
            max_hold_distance: 10.0,
            ray_range: 50.0,
            max_stored_objects: 3,
            queued_color: Vec3::new(0.2, 0.2, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct HeldObject {
    entity: Entity,
    body: RigidBodyHandle,
    distance: f32,
}

#[derive(Debug, Clone, Copy)]
struct RingEntry {
    entity: Entity,
    body: RigidBodyHandle,
}

/// The move-objects tool mode.
pub struct MoveObjectsHandler {
    config: MoveObjectsConfig,
    held: Option<HeldObject>,
    /// Recently released bodies, frozen in place. Oldest first.
    ring: VecDeque<RingEntry>,
    /// Original tints of ring entries, restored on evict or re-grab.
    original_tints: HashMap<Entity, Vec3>,
    rotating: bool,
    saved_yaw: f32,
    /// Movable entities found without a physics body; warned about once.
    missing_body_warned: HashSet<Entity>,
}

impl MoveObjectsHandler {
    pub fn new(config: MoveObjectsConfig) -> Self {
        Self {
            config,
            held: None,
            ring: VecDeque::new(),
            original_tints: HashMap::new(),
            rotating: false,
            saved_yaw: 0.0,
            missing_body_warned: HashSet::new(),
        }
    }

    pub fn held_entity(&self) -> Option<Entity> {
        self.held.map(|h| h.entity)
    }

    pub fn ring_len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    /// Fire entry point. Grabs the movable body under the tool ray, or —
    /// if something is already held — releases it into the history ring.
    pub fn try_grab(
        &mut self,
        tool: &Transform,
        world: &mut World,
        physics: &mut PhysicsWorld,
        colliders: &ColliderMap,
        player_body: RigidBodyHandle,
    ) {
        if self.held.is_some() {
            self.release(world, physics);
            return;
        }

        let Some(hit) =
            physics.raycast_excluding(tool.position, tool.forward(), self.config.ray_range, player_body)
        else {
            return;
        };
        let Some(entity) = colliders.entity(hit.collider) else {
            return;
        };
        if world.get::<&Movable>(entity).is_err() {
            return;
        }
        let Ok(body) = world.get::<&PhysicsBody>(entity).map(|b| b.rigid_body) else {
            if self.missing_body_warned.insert(entity) {
                log::warn!("Movable entity {:?} has no physics body; cannot grab it", entity);
            }
            return;
        };

        // Re-grabbing from the history ring restores its appearance now.
        if let Some(idx) = self.ring.iter().position(|e| e.entity == entity) {
            self.ring.remove(idx);
            self.restore_tint(entity, world);
            physics.unlock_all_motion(body);
        }

        physics.set_gravity_scale(body, 0.0);
        physics.set_linvel(body, Vec3::ZERO);
        physics.set_angvel(body, Vec3::ZERO);

        self.held = Some(HeldObject {
            entity,
            body,
            distance: hit
                .distance
                .clamp(self.config.min_hold_distance, self.config.max_hold_distance),
        });
    }

    /// Hand the held body to the history ring. No-op when nothing is held.
    pub fn release(&mut self, world: &mut World, physics: &mut PhysicsWorld) {
        let Some(held) = self.held.take() else {
            return;
        };

        // Frozen in place: gravity stays off and every axis locks.
        physics.set_linvel(held.body, Vec3::ZERO);
        physics.set_angvel(held.body, Vec3::ZERO);
        physics.lock_all_motion(held.body);
        if let Ok(mut tint) = world.get::<&mut Tint>(held.entity) {
            self.original_tints.entry(held.entity).or_insert(tint.rgb);
            tint.rgb = self.config.queued_color;
        }

        self.ring.push_back(RingEntry {
            entity: held.entity,
            body: held.body,
        });

        if self.ring.len() > self.config.max_stored_objects {
            if let Some(oldest) = self.ring.pop_front() {
                self.restore_physics(oldest.body, physics);
                self.restore_tint(oldest.entity, world);
            }
        }
    }

    /// Per-frame work while this mode is active: float the held body at
    /// the current hold distance and run rotation mode.
    pub fn update(
        &mut self,
        input: &InputState,
        tool: &Transform,
        world: &mut World,
        physics: &mut PhysicsWorld,
        player: &mut PlayerLocomotion,
        dt: f32,
    ) {
        let Some(mut held) = self.held else {
            if self.rotating {
                self.exit_rotation_mode(player);
            }
            return;
        };

        if input.rotate_object_held() {
            if !self.rotating {
                self.enter_rotation_mode(player);
            }
        } else if self.rotating {
            self.exit_rotation_mode(player);
        }

        if self.rotating {
            let delta = input.pointer_delta();
            if delta != Vec2::ZERO {
                if let Some(transform) = physics.body_transform(held.body) {
                    let step = self.config.rotate_speed * dt;
                    let rotation = Quat::from_axis_angle(tool.up(), delta.x * step)
                        * Quat::from_axis_angle(tool.right(), delta.y * step)
                        * transform.rotation;
                    physics.set_rotation(held.body, rotation);
                }
            }
        } else {
            held.distance = (held.distance
                + input.object_distance_axis() * self.config.move_speed * dt)
                .clamp(self.config.min_hold_distance, self.config.max_hold_distance);
        }

        // The held body floats at the hold distance every frame, whether
        // or not any input arrived.
        let target = tool.position + tool.forward() * held.distance;
        physics.set_translation(held.body, target);
        physics.set_linvel(held.body, Vec3::ZERO);
        physics.set_angvel(held.body, Vec3::ZERO);
        if let Ok(mut transform) = world.get::<&mut Transform>(held.entity) {
            transform.position = target;
        }

        self.held = Some(held);
    }

    fn enter_rotation_mode(&mut self, player: &mut PlayerLocomotion) {
        self.saved_yaw = player.yaw;
        player.lock_rotation(true);
        self.rotating = true;
    }

    fn exit_rotation_mode(&mut self, player: &mut PlayerLocomotion) {
        player.yaw = self.saved_yaw;
        player.lock_rotation(false);
        self.rotating = false;
    }

    fn restore_physics(&self, body: RigidBodyHandle, physics: &mut PhysicsWorld) {
        physics.unlock_all_motion(body);
        physics.set_gravity_scale(body, 1.0);
        physics.set_linvel(body, Vec3::ZERO);
        physics.set_angvel(body, Vec3::ZERO);
    }

    fn restore_tint(&mut self, entity: Entity, world: &mut World) {
        if let Some(original) = self.original_tints.remove(&entity) {
            if let Ok(mut tint) = world.get::<&mut Tint>(entity) {
                tint.rgb = original;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{Quat, Transform};
    use physics::CollisionGroup;

    struct Fixture {
        world: World,
        physics: PhysicsWorld,
        colliders: ColliderMap,
        handler: MoveObjectsHandler,
        player_body: RigidBodyHandle,
    }

    impl Fixture {
        fn new() -> Self {
            let mut physics = PhysicsWorld::new();
            let player_body = physics.add_character_body(Vec3::new(0.0, -50.0, 0.0));
            Self {
                world: World::new(),
                physics,
                colliders: ColliderMap::new(),
                handler: MoveObjectsHandler::new(MoveObjectsConfig::default()),
                player_body,
            }
        }

        fn spawn_crate(&mut self, position: Vec3) -> (Entity, RigidBodyHandle) {
            let body = self.physics.add_dynamic_body(position);
            let collider =
                self.physics
                    .add_box_collider(body, Vec3::splat(0.5), CollisionGroup::movable());
            let entity = self.world.spawn((
                Transform::from_position(position),
                Tint::new(Vec3::splat(0.7)),
                Movable,
                PhysicsBody::with_collider(body, collider),
            ));
            self.colliders.insert(collider, entity);
            (entity, body)
        }

        fn grab_at(&mut self, target: Vec3) {
            self.physics.update_query_pipeline();
            let tool =
                Transform::from_position_rotation(target + Vec3::new(0.0, 0.0, 4.0), Quat::IDENTITY);
            self.handler.try_grab(
                &tool,
                &mut self.world,
                &mut self.physics,
                &self.colliders,
                self.player_body,
            );
        }
    }

    #[test]
    fn grab_captures_body_and_second_fire_releases_it() {
        let mut f = Fixture::new();
        let (entity, body) = f.spawn_crate(Vec3::new(0.0, 2.0, 0.0));

        f.grab_at(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(f.handler.held_entity(), Some(entity));
        assert_eq!(f.physics.gravity_scale(body), 0.0);

        // Fire again: toggle to release, object enters the ring frozen.
        f.grab_at(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(f.handler.held_entity(), None);
        assert_eq!(f.handler.ring_len(), 1);
        assert!(f.physics.is_motion_locked(body));
        let tint = f.world.get::<&Tint>(entity).unwrap();
        assert_eq!(tint.rgb, MoveObjectsConfig::default().queued_color);
    }

    #[test]
    fn ring_overflow_restores_the_oldest_fully() {
        let mut f = Fixture::new();
        let mut spawned = Vec::new();
        for i in 0..4 {
            let pos = Vec3::new(i as f32 * 10.0, 2.0, 0.0);
            spawned.push((f.spawn_crate(pos), pos));
        }

        // Grab and release all four; ring capacity is three.
        for &((_, _), pos) in &spawned {
            f.grab_at(pos);
            f.handler.release(&mut f.world, &mut f.physics);
        }

        assert_eq!(f.handler.ring_len(), 3);
        let ((first_entity, first_body), _) = spawned[0];
        assert!(!f.physics.is_motion_locked(first_body));
        assert_eq!(f.physics.gravity_scale(first_body), 1.0);
        assert_eq!(f.physics.linvel(first_body), Vec3::ZERO);
        let tint = f.world.get::<&Tint>(first_entity).unwrap();
        assert_eq!(tint.rgb, Vec3::splat(0.7));
    }

    #[test]
    fn regrab_from_ring_restores_appearance_immediately() {
        let mut f = Fixture::new();
        let (entity, body) = f.spawn_crate(Vec3::new(0.0, 2.0, 0.0));

        f.grab_at(Vec3::new(0.0, 2.0, 0.0));
        f.handler.release(&mut f.world, &mut f.physics);
        assert_eq!(f.handler.ring_len(), 1);

        f.grab_at(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(f.handler.held_entity(), Some(entity));
        assert_eq!(f.handler.ring_len(), 0);
        assert!(!f.physics.is_motion_locked(body));
        let tint = f.world.get::<&Tint>(entity).unwrap();
        assert_eq!(tint.rgb, Vec3::splat(0.7));
    }

    #[test]
    fn grab_misses_and_non_movables_are_silent() {
        let mut f = Fixture::new();
        // Empty world: miss.
        f.grab_at(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(f.handler.held_entity(), None);

        // A solid body without the Movable capability.
        let collider = f
            .physics
            .add_static_cuboid(Vec3::new(0.0, 2.0, 0.0), Vec3::splat(0.5));
        let entity = f.world.spawn((Tint::default(),));
        f.colliders.insert(collider, entity);
        f.grab_at(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(f.handler.held_entity(), None);
    }

    #[test]
    fn release_with_nothing_held_is_a_no_op() {
        let mut f = Fixture::new();
        f.handler.release(&mut f.world, &mut f.physics);
        assert_eq!(f.handler.ring_len(), 0);
    }

    #[test]
    fn hold_distance_clamps_to_configured_range() {
        let mut f = Fixture::new();
        f.spawn_crate(Vec3::new(0.0, 2.0, 0.0));
        f.grab_at(Vec3::new(0.0, 2.0, 0.0));

        let mut player = PlayerLocomotion::new(
            crate::locomotion::LocomotionConfig::default(),
            &mut f.physics,
            Vec3::new(0.0, -40.0, 0.0),
        );
        let tool = Transform::from_position_rotation(Vec3::new(0.0, 2.0, 4.0), Quat::IDENTITY);

        // Pull in hard: many seconds of scroll-down input.
        let mut input = input::InputState::new();
        input.process_scroll(false);
        for _ in 0..100 {
            f.handler.update(&input, &tool, &mut f.world, &mut f.physics, &mut player, 0.5);
        }
        assert_eq!(f.handler.held.unwrap().distance, 1.0);

        // Push out hard.
        let mut input = input::InputState::new();
        input.process_scroll(true);
        for _ in 0..100 {
            f.handler.update(&input, &tool, &mut f.world, &mut f.physics, &mut player, 0.5);
        }
        assert_eq!(f.handler.held.unwrap().distance, 10.0);
    }

    #[test]
    fn rotation_mode_locks_player_and_restores_yaw_on_exit() {
        let mut f = Fixture::new();
        f.spawn_crate(Vec3::new(0.0, 2.0, 0.0));
        f.grab_at(Vec3::new(0.0, 2.0, 0.0));

        let mut player = PlayerLocomotion::new(
            crate::locomotion::LocomotionConfig::default(),
            &mut f.physics,
            Vec3::new(0.0, -40.0, 0.0),
        );
        player.yaw = 1.25;
        let tool = Transform::from_position_rotation(Vec3::new(0.0, 2.0, 4.0), Quat::IDENTITY);

        let mut input = input::InputState::new();
        input.process_mouse_button(input::MouseButton::Right, input::ElementState::Pressed);
        f.handler.update(&input, &tool, &mut f.world, &mut f.physics, &mut player, 1.0 / 60.0);
        assert!(f.handler.is_rotating());
        assert!(player.is_rotation_locked());

        player.yaw = 2.5; // would-be drift while locked
        let input = input::InputState::new();
        f.handler.update(&input, &tool, &mut f.world, &mut f.physics, &mut player, 1.0 / 60.0);
        assert!(!f.handler.is_rotating());
        assert!(!player.is_rotation_locked());
        assert_eq!(player.yaw, 1.25);
    }
}
