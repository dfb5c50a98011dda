//! Physics world management with Rapier3D.

use crate::collision::CollisionGroup;
use engine_core::{Transform, Vec3};
use rapier3d::prelude::*;

fn groups(pair: (Group, Group)) -> InteractionGroups {
    InteractionGroups::new(pair.0, pair.1)
}

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default gravity.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -9.81, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Step the physics simulation.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Update query pipeline for raycasting without stepping the simulation.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    // ── Body / collider construction ───────────────────────────────────────

    /// Add a dynamic rigid body and return its handle.
    pub fn add_dynamic_body(&mut self, position: Vec3) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .build();
        self.rigid_body_set.insert(rigid_body)
    }

    /// Add the player's rigid body: dynamic with rotations locked so the
    /// capsule never tips over. Orientation is game state, not physics.
    pub fn add_character_body(&mut self, position: Vec3) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .lock_rotations()
            .build();
        self.rigid_body_set.insert(rigid_body)
    }

    /// Add a static rigid body (walls, floors).
    pub fn add_static_body(&mut self, position: Vec3) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::fixed()
            .translation(vector![position.x, position.y, position.z])
            .build();
        self.rigid_body_set.insert(rigid_body)
    }

    /// Add a box collider to a rigid body.
    pub fn add_box_collider(
        &mut self,
        body_handle: RigidBodyHandle,
        half_extents: Vec3,
        group: (Group, Group),
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .collision_groups(groups(group))
            .build();
        self.collider_set
            .insert_with_parent(collider, body_handle, &mut self.rigid_body_set)
    }

    /// Add a sphere collider to a rigid body.
    pub fn add_sphere_collider(
        &mut self,
        body_handle: RigidBodyHandle,
        radius: f32,
        group: (Group, Group),
    ) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius)
            .collision_groups(groups(group))
            .build();
        self.collider_set
            .insert_with_parent(collider, body_handle, &mut self.rigid_body_set)
    }

    /// Add a capsule collider (good for characters).
    pub fn add_capsule_collider(
        &mut self,
        body_handle: RigidBodyHandle,
        half_height: f32,
        radius: f32,
        group: (Group, Group),
    ) -> ColliderHandle {
        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .collision_groups(groups(group))
            .build();
        self.collider_set
            .insert_with_parent(collider, body_handle, &mut self.rigid_body_set)
    }

    /// Add a ground plane collider (flat Y=0 half-space).
    pub fn add_ground_plane(&mut self) -> ColliderHandle {
        let collider = ColliderBuilder::halfspace(Vector::y_axis())
            .collision_groups(groups(CollisionGroup::environment()))
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a free-standing static cuboid collider (no parent body).
    pub fn add_static_cuboid(&mut self, translation: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![translation.x, translation.y, translation.z])
            .collision_groups(groups(CollisionGroup::environment()))
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a free-standing cuboid sensor region. Sensors generate
    /// intersection events but never collision response.
    pub fn add_sensor_cuboid(&mut self, translation: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![translation.x, translation.y, translation.z])
            .sensor(true)
            .collision_groups(groups(CollisionGroup::sensor()))
            .build();
        self.collider_set.insert(collider)
    }

    /// Remove a collider by its handle.
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.rigid_body_set,
            true,
        );
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    // ── Body state access / mutation ───────────────────────────────────────

    /// Get the transform of a rigid body.
    pub fn body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            let rot = body.rotation();
            Transform {
                position: Vec3::new(pos.x, pos.y, pos.z),
                rotation: glam::Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w),
                scale: Vec3::ONE,
            }
        })
    }

    /// Get the world translation of a rigid body.
    pub fn body_translation(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(handle)
            .map(|body| {
                let pos = body.translation();
                Vec3::new(pos.x, pos.y, pos.z)
            })
    }

    /// Teleport a body to a new translation.
    pub fn set_translation(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(vector![position.x, position.y, position.z], true);
        }
    }

    /// Set a body's orientation directly (held-object rotation mode).
    pub fn set_rotation(&mut self, handle: RigidBodyHandle, rotation: glam::Quat) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let q = rapier3d::na::Unit::new_normalize(rapier3d::na::Quaternion::new(
                rotation.w, rotation.x, rotation.y, rotation.z,
            ));
            body.set_rotation(q, true);
        }
    }

    /// Get the linear velocity of a body.
    pub fn linvel(&self, handle: RigidBodyHandle) -> Vec3 {
        self.rigid_body_set
            .get(handle)
            .map(|body| {
                let v = body.linvel();
                Vec3::new(v.x, v.y, v.z)
            })
            .unwrap_or(Vec3::ZERO)
    }

    /// Set the linear velocity of a body.
    pub fn set_linvel(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(vector![velocity.x, velocity.y, velocity.z], true);
        }
    }

    /// Set the angular velocity of a body.
    pub fn set_angvel(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_angvel(vector![velocity.x, velocity.y, velocity.z], true);
        }
    }

    /// Apply an impulse to a dynamic body.
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.apply_impulse(vector![impulse.x, impulse.y, impulse.z], true);
        }
    }

    /// Scale how strongly gravity affects a body (0 = weightless).
    pub fn set_gravity_scale(&mut self, handle: RigidBodyHandle, scale: f32) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_gravity_scale(scale, true);
        }
    }

    /// Get a body's gravity scale.
    pub fn gravity_scale(&self, handle: RigidBodyHandle) -> f32 {
        self.rigid_body_set
            .get(handle)
            .map(|body| body.gravity_scale())
            .unwrap_or(1.0)
    }

    /// Freeze a body completely: all translations and rotations locked.
    pub fn lock_all_motion(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_locked_axes(LockedAxes::all(), true);
        }
    }

    /// Clear every motion lock on a body.
    pub fn unlock_all_motion(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_locked_axes(LockedAxes::empty(), true);
        }
    }

    /// Check whether a body has all motion locked.
    pub fn is_motion_locked(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .get(handle)
            .map(|body| body.locked_axes() == LockedAxes::all())
            .unwrap_or(false)
    }

    /// Switch a body between kinematic (charging projectile at the muzzle)
    /// and dynamic (in flight).
    pub fn set_kinematic(&mut self, handle: RigidBodyHandle, kinematic: bool) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let ty = if kinematic {
                RigidBodyType::KinematicPositionBased
            } else {
                RigidBodyType::Dynamic
            };
            body.set_body_type(ty, true);
        }
    }

    /// Check whether a body is kinematic.
    pub fn is_kinematic(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .get(handle)
            .map(|body| body.is_kinematic())
            .unwrap_or(false)
    }

    // ── Collider shape mutation (crouch / resize / charge growth) ──────────

    /// Replace a capsule collider's dimensions.
    pub fn set_capsule(&mut self, handle: ColliderHandle, half_height: f32, radius: f32) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_shape(SharedShape::capsule_y(half_height, radius));
        }
    }

    /// Replace a ball collider's radius.
    pub fn set_ball_radius(&mut self, handle: ColliderHandle, radius: f32) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_shape(SharedShape::ball(radius));
        }
    }

    /// Offset a collider relative to its parent body (crouch keeps the
    /// capsule bottom planted while the height shrinks).
    pub fn set_collider_offset(&mut self, handle: ColliderHandle, offset: Vec3) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_translation_wrt_parent(vector![offset.x, offset.y, offset.z]);
        }
    }

    /// Look up the body a collider is attached to.
    pub fn collider_parent(&self, handle: ColliderHandle) -> Option<RigidBodyHandle> {
        self.collider_set.get(handle).and_then(|c| c.parent())
    }

    /// World translation of a collider.
    pub fn collider_translation(&self, handle: ColliderHandle) -> Option<Vec3> {
        self.collider_set.get(handle).map(|c| {
            let pos = c.translation();
            Vec3::new(pos.x, pos.y, pos.z)
        })
    }

    /// Half extents of a cuboid collider, if it is one.
    pub fn cuboid_half_extents(&self, handle: ColliderHandle) -> Option<Vec3> {
        self.collider_set.get(handle).and_then(|c| {
            c.shape().as_cuboid().map(|cuboid| {
                Vec3::new(
                    cuboid.half_extents.x,
                    cuboid.half_extents.y,
                    cuboid.half_extents.z,
                )
            })
        })
    }
}
