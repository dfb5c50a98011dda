//! Player locomotion: ground/air movement, crouch, climbing, resizing,
//! and trampoline bounces over a rapier dynamic body.
//!
//! The body owns position and velocity; this module owns every rule about
//! how they change. Two entry points: `frame_update` (input edges, look,
//! timed blends) and `fixed_update` (movement integration, ground probe,
//! custom gravity).

use engine_core::{Vec2, Vec3, World};
use input::InputState;
use physics::{ColliderHandle, CollisionGroup, PhysicsWorld, RigidBodyHandle};

use crate::modify_surfaces::SurfaceLedger;
use crate::world::{ColliderMap, SurfaceKind};

const GRAVITY: f32 = -9.81;

/// Tuning for the locomotion controller.
#[derive(Debug, Clone)]
pub struct LocomotionConfig {
    /// Base movement speed at scale 1.
    pub move_speed: f32,
    /// Sprint speed multiplier.
    pub sprint_multiplier: f32,
    /// Air control authority while airborne.
    pub air_control: f32,
    /// Base jump velocity at scale 1.
    pub jump_force: f32,
    /// Maximum jumps per grounded cycle.
    pub max_jump_count: u32,
    /// Jump force multiplier while crouched.
    pub crouch_jump_multiplier: f32,
    /// Extra gravity while ascending without jump held ("jump cut").
    pub gravity_scale: f32,
    /// Extra gravity while falling.
    pub fall_multiplier: f32,
    /// Ground probe reach below the capsule.
    pub ground_check_distance: f32,
    /// Ground probe ball radius.
    pub ground_check_radius: f32,
    /// Standing capsule height.
    pub stand_height: f32,
    /// Crouched capsule height.
    pub crouch_height: f32,
    /// Capsule radius.
    pub capsule_radius: f32,
    /// Crouch height blend duration, seconds.
    pub crouch_blend_seconds: f32,
    /// Toggle crouch (true) vs. hold to crouch.
    pub toggle_crouch: bool,
    /// Climb movement speed.
    pub climb_speed: f32,
    /// Velocity of a jump away from a climbed wall.
    pub wall_jump_force: f32,
    /// Forward reach of the wall-facing check.
    pub wall_check_distance: f32,
    /// Shrink target is 1 / this factor.
    pub size_reduction_factor: f32,
    /// Resize blend duration, seconds.
    pub shrink_duration: f32,
    /// Look sensitivity (radians per pointer unit).
    pub look_sensitivity: f32,
    /// One-shot bounce multiplier for a well-timed jump.
    pub high_bounce_multiplier: f32,
    /// Seconds after landing in which a jump counts as well timed.
    pub bounce_timing_window: f32,
    /// Passive bounce decay per bounce.
    pub bounce_damping: f32,
    /// Passive bounces before the trampoline gives up.
    pub max_bounce_count: u32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            sprint_multiplier: 1.5,
            air_control: 0.5,
            jump_force: 7.0,
            max_jump_count: 1,
            crouch_jump_multiplier: 1.2,
            gravity_scale: 2.0,
            fall_multiplier: 2.5,
            ground_check_distance: 0.1,
            ground_check_radius: 0.3,
            stand_height: 2.0,
            crouch_height: 1.0,
            capsule_radius: 0.35,
            crouch_blend_seconds: 0.25,
            toggle_crouch: true,
            climb_speed: 3.0,
            wall_jump_force: 10.0,
            wall_check_distance: 1.0,
            size_reduction_factor: 10.0,
            shrink_duration: 1.0,
            look_sensitivity: 0.002,
            high_bounce_multiplier: 2.0,
            bounce_timing_window: 0.2,
            bounce_damping: 0.8,
            max_bounce_count: 5,
        }
    }
}

/// A timed interpolation advanced once per frame. No suspension primitive:
/// the owning component keeps calling `advance` until `done`.
#[derive(Debug, Clone, Copy)]
struct Blend {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl Blend {
    fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration,
        }
    }

    fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt;
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    fn done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// The player's movement state machine.
pub struct PlayerLocomotion {
    config: LocomotionConfig,
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,

    // Base values snapshotted once at spawn; derived values are always
    // recomputed as base * f(scale) so repeated resizing round-trips.
    base_move_speed: f32,
    base_jump_force: f32,
    move_speed: f32,
    jump_force: f32,

    /// 1.0 normal, 1/size_reduction_factor when small.
    pub scale_factor: f32,
    is_small: bool,

    pub yaw: f32,
    pub pitch: f32,
    rotation_locked: bool,

    pub is_grounded: bool,
    pub is_crouching: bool,
    pub is_climbing: bool,
    pub is_resizing: bool,
    pub is_on_bounce_surface: bool,

    jump_count: u32,
    can_jump: bool,

    bounce_multiplier: f32,
    last_landing_time: f32,
    bounce_count: u32,

    in_climb_region: bool,

    resize_blend: Option<Blend>,
    crouch_blend: Option<Blend>,
    /// Unscaled capsule height, between crouch_height and stand_height.
    current_height: f32,

    /// Vertical offset of the camera eye above the body origin. The
    /// out-of-scope camera reads this.
    pub eye_height_offset: f32,
}

impl PlayerLocomotion {
    pub fn new(config: LocomotionConfig, physics: &mut PhysicsWorld, spawn: Vec3) -> Self {
        let body = physics.add_character_body(spawn);
        let radius = config.capsule_radius;
        let half_cyl = (config.stand_height / 2.0 - radius).max(0.01);
        let collider =
            physics.add_capsule_collider(body, half_cyl, radius, CollisionGroup::player());

        let mut player = Self {
            base_move_speed: config.move_speed,
            base_jump_force: config.jump_force,
            move_speed: config.move_speed,
            jump_force: config.jump_force,
            scale_factor: 1.0,
            is_small: false,
            yaw: 0.0,
            pitch: 0.0,
            rotation_locked: false,
            is_grounded: false,
            is_crouching: false,
            is_climbing: false,
            is_resizing: false,
            is_on_bounce_surface: false,
            jump_count: 0,
            can_jump: true,
            bounce_multiplier: 1.0,
            last_landing_time: -1.0,
            bounce_count: 0,
            in_climb_region: false,
            resize_blend: None,
            crouch_blend: None,
            current_height: config.stand_height,
            eye_height_offset: 0.0,
            body,
            collider,
            config,
        };
        player.apply_dimensions(physics);
        player
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn jump_force(&self) -> f32 {
        self.jump_force
    }

    /// Lock yaw control (move-objects rotation mode orbits the held object
    /// instead of turning the player).
    pub fn lock_rotation(&mut self, locked: bool) {
        self.rotation_locked = locked;
    }

    pub fn is_rotation_locked(&self) -> bool {
        self.rotation_locked
    }

    /// Horizontal forward direction derived from yaw.
    pub fn forward_flat(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Full look direction including pitch.
    pub fn look_direction(&self) -> Vec3 {
        let (sp, cp) = (self.pitch.sin(), self.pitch.cos());
        let (sy, cy) = (self.yaw.sin(), self.yaw.cos());
        Vec3::new(-sy * cp, sp, -cy * cp).normalize()
    }

    fn right_flat(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    // ── Frame domain: input edges, look, timed blends ─────────────────────

    pub fn frame_update(
        &mut self,
        input: &InputState,
        physics: &mut PhysicsWorld,
        now: f32,
        dt: f32,
    ) {
        if !self.rotation_locked {
            let delta = input.pointer_delta();
            self.yaw -= delta.x * self.config.look_sensitivity;
            self.pitch = (self.pitch - delta.y * self.config.look_sensitivity)
                .clamp(-1.55, 1.55);
        }

        // Climb toggle: Interact flips climbing while inside a region.
        if input.interact_pressed() && self.in_climb_region {
            if self.is_climbing {
                self.stop_climbing(physics);
            } else {
                self.start_climbing(physics);
            }
        }

        if input.jump_pressed() {
            self.handle_jump(physics, now);
        }

        if !self.is_resizing && !self.is_climbing {
            self.handle_crouch_input(input);
        }
        if input.change_size_pressed() {
            self.begin_resize();
        }

        self.advance_resize_blend(physics, dt);
        self.advance_crouch_blend(physics, dt);
    }

    fn handle_jump(&mut self, physics: &mut PhysicsWorld, now: f32) {
        if self.is_resizing {
            log::debug!("Jump ignored mid-resize");
            return;
        }

        if self.is_climbing {
            // Wall jump: leap away from the wall along the look direction.
            let dir = (self.look_direction() + Vec3::Y).normalize();
            self.stop_climbing(physics);
            physics.set_linvel(self.body, dir * self.config.wall_jump_force);
            return;
        }

        if self.is_on_bounce_surface {
            let multiplier = if now - self.last_landing_time <= self.config.bounce_timing_window {
                self.config.high_bounce_multiplier
            } else {
                self.bounce_multiplier
            };
            let mut v = physics.linvel(self.body);
            v.y = self.jump_force * multiplier;
            physics.set_linvel(self.body, v);
            self.is_on_bounce_surface = false;
            self.bounce_count = 0;
            self.is_grounded = false;
            return;
        }

        if self.is_grounded && self.jump_count < self.config.max_jump_count && self.can_jump {
            let force = if self.is_crouching {
                self.jump_force * self.config.crouch_jump_multiplier
            } else {
                self.jump_force
            };
            let mut v = physics.linvel(self.body);
            v.y = force;
            physics.set_linvel(self.body, v);

            self.jump_count += 1;
            if self.jump_count >= self.config.max_jump_count {
                self.can_jump = false;
            }
            self.is_grounded = false;
        } else {
            log::debug!(
                "Jump rejected: grounded={} count={} can_jump={}",
                self.is_grounded,
                self.jump_count,
                self.can_jump
            );
        }
    }

    fn handle_crouch_input(&mut self, input: &InputState) {
        if self.config.toggle_crouch {
            if input.crouch_pressed() {
                self.set_crouch(!self.is_crouching);
            }
        } else if input.crouch_held() != self.is_crouching {
            self.set_crouch(input.crouch_held());
        }
    }

    fn set_crouch(&mut self, crouched: bool) {
        // Re-entry guard: one height blend at a time.
        if self.crouch_blend.is_some() {
            return;
        }
        self.is_crouching = crouched;
        let target = if crouched {
            self.config.crouch_height
        } else {
            self.config.stand_height
        };
        self.crouch_blend = Some(Blend::new(
            self.current_height,
            target,
            self.config.crouch_blend_seconds,
        ));
    }

    fn begin_resize(&mut self) {
        // Re-entry guard: a resize in flight absorbs further requests.
        if self.is_resizing {
            log::debug!("Size change ignored: already resizing");
            return;
        }
        self.is_resizing = true;
        self.is_small = !self.is_small;
        let target = if self.is_small {
            1.0 / self.config.size_reduction_factor
        } else {
            1.0
        };
        self.resize_blend = Some(Blend::new(
            self.scale_factor,
            target,
            self.config.shrink_duration,
        ));
    }

    fn advance_resize_blend(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        let Some(mut blend) = self.resize_blend else {
            return;
        };
        let scale = blend.advance(dt);
        self.apply_scale(scale, physics);

        if blend.done() {
            self.resize_blend = None;
            self.is_resizing = false;
            // A crouched capsule needs its height re-blended for the new scale.
            if self.is_crouching {
                self.crouch_blend = Some(Blend::new(
                    self.current_height,
                    self.config.crouch_height,
                    self.config.crouch_blend_seconds,
                ));
            }
        } else {
            self.resize_blend = Some(blend);
        }
    }

    fn advance_crouch_blend(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        let Some(mut blend) = self.crouch_blend else {
            return;
        };
        self.current_height = blend.advance(dt);
        self.apply_dimensions(physics);
        if blend.done() {
            self.crouch_blend = None;
        } else {
            self.crouch_blend = Some(blend);
        }
    }

    /// Set the scale factor and recompute everything derived from it.
    fn apply_scale(&mut self, scale: f32, physics: &mut PhysicsWorld) {
        self.scale_factor = scale;
        self.update_derived_values();
        self.apply_dimensions(physics);
    }

    /// Derived values are pure functions of base values and scale, never
    /// written in place, so returning to scale 1 restores them exactly.
    fn update_derived_values(&mut self) {
        let jump_scale = self.scale_factor.clamp(0.5, 2.0);
        self.jump_force = self.base_jump_force * jump_scale;
        self.move_speed = self.base_move_speed * self.scale_factor;
    }

    /// Resize the capsule for the current height and scale, keeping its
    /// bottom planted, and reposition the camera eye.
    fn apply_dimensions(&mut self, physics: &mut PhysicsWorld) {
        let height = self.current_height * self.scale_factor;
        let radius = self.config.capsule_radius * self.scale_factor;
        let half_cyl = (height / 2.0 - radius).max(0.01);
        physics.set_capsule(self.collider, half_cyl, radius);

        let stand = self.config.stand_height * self.scale_factor;
        let center_drop = (stand - height) / 2.0;
        physics.set_collider_offset(self.collider, Vec3::new(0.0, -center_drop, 0.0));

        self.eye_height_offset = height / 2.0 - center_drop - 0.15 * self.scale_factor;
    }

    // ── Fixed domain: integration, probes, gravity ────────────────────────

    pub fn fixed_update(
        &mut self,
        input: &InputState,
        physics: &mut PhysicsWorld,
        world: &World,
        colliders: &ColliderMap,
        surfaces: &SurfaceLedger,
        now: f32,
        dt: f32,
    ) {
        self.in_climb_region = physics
            .sensor_overlaps(self.collider)
            .iter()
            .any(|c| surfaces.is_climb_region(*c));

        if self.is_climbing {
            if !self.in_climb_region {
                self.stop_climbing(physics);
            } else {
                self.climb_move(input, physics);
                return;
            }
        }

        // Auto-entry: in region, facing a wall, pushing forward.
        if !self.is_climbing
            && self.in_climb_region
            && input.move_axis().y > 0.0
            && self.is_facing_wall(physics, world, colliders)
        {
            self.start_climbing(physics);
            return;
        }

        if self.is_resizing {
            // Movement and jumps are suppressed for the duration.
            return;
        }

        self.apply_movement(input, physics, dt);
        self.check_grounded(physics, surfaces, now);
        if !self.is_grounded {
            self.apply_custom_gravity(input, physics, dt);
        }
    }

    fn apply_movement(&mut self, input: &InputState, physics: &mut PhysicsWorld, dt: f32) {
        let axis = if self.rotation_locked {
            Vec2::ZERO
        } else {
            input.move_axis()
        };
        let dir = self.forward_flat() * axis.y + self.right_flat() * axis.x;
        let velocity = physics.linvel(self.body);

        if self.is_grounded {
            let speed = if input.sprint_held() {
                self.move_speed * self.config.sprint_multiplier
            } else {
                self.move_speed
            };
            physics.set_linvel(
                self.body,
                Vec3::new(dir.x * speed, velocity.y, dir.z * speed),
            );
        } else {
            // Air control: steer toward the input at reduced authority,
            // never exceeding sprint speed.
            let target = dir * self.move_speed;
            let blend = (self.config.air_control * dt).clamp(0.0, 1.0);
            let mut horizontal = Vec2::new(velocity.x, velocity.z)
                .lerp(Vec2::new(target.x, target.z), blend);
            let max = self.move_speed * self.config.sprint_multiplier;
            if horizontal.length() > max {
                horizontal = horizontal.normalize() * max;
            }
            physics.set_linvel(
                self.body,
                Vec3::new(horizontal.x, velocity.y, horizontal.y),
            );
        }
    }

    fn check_grounded(&mut self, physics: &mut PhysicsWorld, surfaces: &SurfaceLedger, now: f32) {
        // Just after a jump or bounce the probe can still reach the floor
        // for a tick or two; an ascending body is never grounded.
        if physics.linvel(self.body).y > 0.1 {
            self.is_grounded = false;
            return;
        }
        let Some(center) = physics.body_translation(self.body) else {
            return;
        };
        let radius = self.config.ground_check_radius * self.scale_factor;
        let reach = self.current_height * self.scale_factor / 2.0
            + self.config.ground_check_distance * self.scale_factor;

        let hit = physics.ground_probe(center, radius, reach, self.body);

        match hit {
            Some(ground) if !self.is_grounded => {
                self.is_grounded = true;
                self.jump_count = 0;
                self.can_jump = true;

                match surfaces.bounce_multiplier(ground) {
                    Some(multiplier) => self.on_bounce_landing(multiplier, physics, now),
                    None => {
                        // Landing on ordinary ground ends any bounce cycle.
                        self.is_on_bounce_surface = false;
                        self.bounce_count = 0;
                    }
                }
            }
            Some(_) => {}
            None => self.is_grounded = false,
        }
    }

    /// Passive trampoline contact: each landing bounces with decaying
    /// force, until the bounce budget is spent.
    fn on_bounce_landing(&mut self, multiplier: f32, physics: &mut PhysicsWorld, now: f32) {
        self.last_landing_time = now;
        self.is_on_bounce_surface = true;
        self.bounce_multiplier = multiplier;

        if self.bounce_count < self.config.max_bounce_count {
            let force = self.jump_force
                * multiplier
                * self.config.bounce_damping.powi(self.bounce_count as i32);
            let mut v = physics.linvel(self.body);
            v.y = force;
            physics.set_linvel(self.body, v);
            self.bounce_count += 1;
            self.is_grounded = false;
        } else {
            self.bounce_count = 0;
            self.is_on_bounce_surface = false;
        }
    }

    fn apply_custom_gravity(&mut self, input: &InputState, physics: &mut PhysicsWorld, dt: f32) {
        let mut v = physics.linvel(self.body);
        if v.y < 0.0 {
            v.y += GRAVITY * (self.config.fall_multiplier - 1.0) * dt * self.scale_factor;
        } else if v.y > 0.0 && !input.jump_held() {
            v.y += GRAVITY * (self.config.gravity_scale - 1.0) * dt * self.scale_factor;
        }
        physics.set_linvel(self.body, v);
    }

    fn climb_move(&mut self, input: &InputState, physics: &mut PhysicsWorld) {
        let axis = input.move_axis();
        let velocity =
            self.right_flat() * axis.x * self.config.climb_speed + Vec3::Y * axis.y * self.config.climb_speed;
        physics.set_linvel(self.body, velocity);
    }

    fn is_facing_wall(
        &self,
        physics: &PhysicsWorld,
        world: &World,
        colliders: &ColliderMap,
    ) -> bool {
        let Some(origin) = physics.body_translation(self.body) else {
            return false;
        };
        let reach = self.config.wall_check_distance * self.scale_factor;
        let Some(hit) = physics.raycast_excluding(origin, self.forward_flat(), reach, self.body)
        else {
            return false;
        };
        colliders
            .entity(hit.collider)
            .and_then(|e| world.get::<&SurfaceKind>(e).ok().map(|k| *k == SurfaceKind::Wall))
            .unwrap_or(false)
    }

    fn start_climbing(&mut self, physics: &mut PhysicsWorld) {
        self.is_climbing = true;
        physics.set_gravity_scale(self.body, 0.0);
        physics.set_linvel(self.body, Vec3::ZERO);
        self.is_grounded = false;
    }

    fn stop_climbing(&mut self, physics: &mut PhysicsWorld) {
        self.is_climbing = false;
        physics.set_gravity_scale(self.body, 1.0);
        physics.set_linvel(self.body, Vec3::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modify_surfaces::SurfaceLedger;
    use input::{ElementState, KeyCode};

    fn setup() -> (PhysicsWorld, PlayerLocomotion, World, ColliderMap, SurfaceLedger) {
        let mut physics = PhysicsWorld::new();
        physics.add_ground_plane();
        let player =
            PlayerLocomotion::new(LocomotionConfig::default(), &mut physics, Vec3::new(0.0, 1.0, 0.0));
        (
            physics,
            player,
            World::new(),
            ColliderMap::new(),
            SurfaceLedger::new(3),
        )
    }

    fn settle(
        physics: &mut PhysicsWorld,
        player: &mut PlayerLocomotion,
        world: &World,
        colliders: &ColliderMap,
        surfaces: &SurfaceLedger,
    ) {
        let input = InputState::new();
        for i in 0..120 {
            player.fixed_update(
                &input,
                physics,
                world,
                colliders,
                surfaces,
                i as f32 / 60.0,
                1.0 / 60.0,
            );
            physics.step();
        }
    }

    fn press(key: KeyCode) -> InputState {
        let mut input = InputState::new();
        input.process_keyboard(key, ElementState::Pressed);
        input
    }

    #[test]
    fn derived_values_round_trip_through_resize() {
        let (mut physics, mut player, ..) = setup();
        let base_speed = player.move_speed();
        let base_jump = player.jump_force();

        // Shrink: run the blend to completion.
        player.frame_update(&press(KeyCode::KeyX), &mut physics, 0.0, 0.0);
        assert!(player.is_resizing);
        let empty = InputState::new();
        for _ in 0..30 {
            player.frame_update(&empty, &mut physics, 0.0, 0.1);
        }
        assert!(!player.is_resizing);
        let k = player.config().size_reduction_factor;
        assert!((player.scale_factor - 1.0 / k).abs() < 1e-6);
        assert!((player.move_speed() - base_speed / k).abs() < 1e-5);
        // Jump scaling is clamped at 0.5 for very small scales.
        assert!((player.jump_force() - base_jump * 0.5).abs() < 1e-5);

        // Grow back: derived values restore exactly.
        player.frame_update(&press(KeyCode::KeyX), &mut physics, 0.0, 0.0);
        for _ in 0..30 {
            player.frame_update(&empty, &mut physics, 0.0, 0.1);
        }
        assert_eq!(player.scale_factor, 1.0);
        assert_eq!(player.move_speed(), base_speed);
        assert_eq!(player.jump_force(), base_jump);
    }

    #[test]
    fn resize_request_mid_resize_is_ignored() {
        let (mut physics, mut player, ..) = setup();
        player.frame_update(&press(KeyCode::KeyX), &mut physics, 0.0, 0.0);
        // Second edge mid-blend must not flip the target back.
        player.frame_update(&press(KeyCode::KeyX), &mut physics, 0.0, 0.1);
        let empty = InputState::new();
        for _ in 0..30 {
            player.frame_update(&empty, &mut physics, 0.0, 0.1);
        }
        let k = player.config().size_reduction_factor;
        assert!((player.scale_factor - 1.0 / k).abs() < 1e-6);
    }

    #[test]
    fn jump_requires_grounded_state() {
        let (mut physics, mut player, world, colliders, surfaces) = setup();

        // Airborne at spawn: the jump is absorbed with no state change.
        assert!(!player.is_grounded);
        player.frame_update(&press(KeyCode::Space), &mut physics, 0.0, 1.0 / 60.0);
        assert_eq!(player.jump_count, 0);

        settle(&mut physics, &mut player, &world, &colliders, &surfaces);
        assert!(player.is_grounded);

        player.frame_update(&press(KeyCode::Space), &mut physics, 2.0, 1.0 / 60.0);
        assert_eq!(player.jump_count, 1);
        assert!(physics.linvel(player.body).y > 0.0);

        // max_jump_count is 1: a second jump before landing is rejected.
        player.frame_update(&press(KeyCode::Space), &mut physics, 2.1, 1.0 / 60.0);
        assert_eq!(player.jump_count, 1);
    }

    #[test]
    fn crouch_jump_applies_multiplier() {
        let (mut physics, mut player, world, colliders, surfaces) = setup();
        settle(&mut physics, &mut player, &world, &colliders, &surfaces);
        assert!(player.is_grounded);

        player.is_crouching = true;
        player.frame_update(&press(KeyCode::Space), &mut physics, 2.0, 1.0 / 60.0);
        let expected = player.jump_force() * player.config().crouch_jump_multiplier;
        assert!((physics.linvel(player.body).y - expected).abs() < 1e-5);
    }

    #[test]
    fn landing_resets_jump_budget() {
        let (mut physics, mut player, world, colliders, surfaces) = setup();
        settle(&mut physics, &mut player, &world, &colliders, &surfaces);

        player.frame_update(&press(KeyCode::Space), &mut physics, 2.0, 1.0 / 60.0);
        assert!(!player.can_jump);

        settle(&mut physics, &mut player, &world, &colliders, &surfaces);
        assert!(player.is_grounded);
        assert_eq!(player.jump_count, 0);
        assert!(player.can_jump);
    }

    #[test]
    fn passive_bounce_decays_and_caps() {
        let (mut physics, mut player, ..) = setup();
        let jump = player.jump_force();

        player.on_bounce_landing(2.0, &mut physics, 0.0);
        assert!((physics.linvel(player.body).y - jump * 2.0).abs() < 1e-5);

        player.on_bounce_landing(2.0, &mut physics, 0.1);
        assert!((physics.linvel(player.body).y - jump * 2.0 * 0.8).abs() < 1e-5);

        // Burn through the remaining bounce budget.
        for i in 2..5 {
            player.on_bounce_landing(2.0, &mut physics, i as f32 * 0.1);
        }
        assert_eq!(player.bounce_count, 5);

        // Budget spent: the next landing stops the bouncing entirely.
        player.on_bounce_landing(2.0, &mut physics, 1.0);
        assert!(!player.is_on_bounce_surface);
        assert_eq!(player.bounce_count, 0);
    }

    #[test]
    fn timed_jump_on_trampoline_high_bounces_once() {
        let (mut physics, mut player, ..) = setup();
        let jump = player.jump_force();

        player.on_bounce_landing(1.5, &mut physics, 10.0);
        assert!(player.is_on_bounce_surface);

        // Jump inside the timing window: high bounce, one shot.
        player.frame_update(&press(KeyCode::Space), &mut physics, 10.1, 1.0 / 60.0);
        let v = physics.linvel(player.body);
        assert!((v.y - jump * player.config().high_bounce_multiplier).abs() < 1e-5);
        assert!(!player.is_on_bounce_surface);
    }

    #[test]
    fn late_jump_on_trampoline_uses_surface_multiplier() {
        let (mut physics, mut player, ..) = setup();
        let jump = player.jump_force();

        player.on_bounce_landing(1.5, &mut physics, 10.0);
        player.frame_update(&press(KeyCode::Space), &mut physics, 11.0, 1.0 / 60.0);
        let v = physics.linvel(player.body);
        assert!((v.y - jump * 1.5).abs() < 1e-5);
    }

    #[test]
    fn sprint_scales_ground_speed() {
        let (mut physics, mut player, world, colliders, surfaces) = setup();
        settle(&mut physics, &mut player, &world, &colliders, &surfaces);

        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::ShiftLeft, ElementState::Pressed);
        player.fixed_update(&input, &mut physics, &world, &colliders, &surfaces, 3.0, 1.0 / 60.0);

        let v = physics.linvel(player.body);
        let expected = player.move_speed() * player.config().sprint_multiplier;
        assert!((Vec2::new(v.x, v.z).length() - expected).abs() < 1e-4);
    }

    #[test]
    fn air_speed_never_exceeds_sprint_speed() {
        let (mut physics, mut player, world, colliders, surfaces) = setup();

        // Launched hard sideways while airborne: air control clamps the
        // horizontal speed even with no steering input.
        physics.set_linvel(player.body, Vec3::new(100.0, 5.0, 0.0));
        let input = InputState::new();
        player.fixed_update(&input, &mut physics, &world, &colliders, &surfaces, 0.0, 1.0 / 60.0);

        let v = physics.linvel(player.body);
        let max = player.move_speed() * player.config().sprint_multiplier;
        assert!(Vec2::new(v.x, v.z).length() <= max + 1e-4);
    }

    #[test]
    fn wall_jump_exits_climbing_and_restores_gravity() {
        let (mut physics, mut player, ..) = setup();
        player.start_climbing(&mut physics);

        player.frame_update(&press(KeyCode::Space), &mut physics, 0.0, 1.0 / 60.0);
        assert!(!player.is_climbing);
        assert_eq!(physics.gravity_scale(player.body), 1.0);
        assert!(physics.linvel(player.body).y > 0.0);
    }

    #[test]
    fn interact_toggles_climbing_inside_a_region() {
        let (mut physics, mut player, ..) = setup();
        player.in_climb_region = true;

        player.frame_update(&press(KeyCode::KeyE), &mut physics, 0.0, 1.0 / 60.0);
        assert!(player.is_climbing);
        player.frame_update(&press(KeyCode::KeyE), &mut physics, 0.0, 1.0 / 60.0);
        assert!(!player.is_climbing);
    }

    #[test]
    fn leaving_the_region_stops_climbing() {
        let (mut physics, mut player, world, colliders, surfaces) = setup();
        player.start_climbing(&mut physics);

        // No climb region overlaps the player, so the next tick drops back
        // to gravity-driven motion.
        let input = InputState::new();
        player.fixed_update(&input, &mut physics, &world, &colliders, &surfaces, 0.0, 1.0 / 60.0);
        assert!(!player.is_climbing);
        assert_eq!(physics.gravity_scale(player.body), 1.0);
    }

    #[test]
    fn climbing_disables_gravity_and_exit_restores_it() {
        let (mut physics, mut player, ..) = setup();
        player.start_climbing(&mut physics);
        assert!(player.is_climbing);
        assert_eq!(physics.gravity_scale(player.body), 0.0);

        player.stop_climbing(&mut physics);
        assert!(!player.is_climbing);
        assert_eq!(physics.gravity_scale(player.body), 1.0);
        assert_eq!(physics.linvel(player.body), Vec3::ZERO);
    }

    #[test]
    fn crouch_blend_reaches_crouch_height() {
        let (mut physics, mut player, ..) = setup();
        player.frame_update(&press(KeyCode::ControlLeft), &mut physics, 0.0, 0.0);
        assert!(player.is_crouching);
        let empty = InputState::new();
        for _ in 0..30 {
            player.frame_update(&empty, &mut physics, 0.0, 0.1);
        }
        assert_eq!(player.current_height, player.config().crouch_height);
        // Toggle back up.
        player.frame_update(&press(KeyCode::ControlLeft), &mut physics, 0.0, 0.0);
        for _ in 0..30 {
            player.frame_update(&empty, &mut physics, 0.0, 0.1);
        }
        assert!(!player.is_crouching);
        assert_eq!(player.current_height, player.config().stand_height);
    }
}
