//! Raycast and volume queries: tool rays, ground probes, trigger overlap.

use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

impl PhysicsWorld {
    /// Cast a ray and return the first solid hit. Sensors are ignored so a
    /// tool ray never selects a trigger region instead of the surface
    /// behind it.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        self.raycast_filtered(origin, direction, max_distance, QueryFilter::default().exclude_sensors())
    }

    /// Cast a ray ignoring one rigid body (the caster's own).
    pub fn raycast_excluding(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: RigidBodyHandle,
    ) -> Option<RaycastHit> {
        let filter = QueryFilter::default()
            .exclude_sensors()
            .exclude_rigid_body(exclude);
        self.raycast_filtered(origin, direction, max_distance, filter)
    }

    fn raycast_filtered(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                RaycastHit {
                    collider,
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                }
            })
    }

    /// Downward ball-cast used to classify grounded vs. airborne. Returns
    /// the collider standing under the shape, if any within `max_distance`.
    pub fn ground_probe(
        &self,
        center: Vec3,
        radius: f32,
        max_distance: f32,
        exclude: RigidBodyHandle,
    ) -> Option<ColliderHandle> {
        let shape = Ball::new(radius);
        let shape_pos = Isometry::translation(center.x, center.y, center.z);
        let shape_vel = vector![0.0, -1.0, 0.0];
        let filter = QueryFilter::default()
            .exclude_sensors()
            .exclude_rigid_body(exclude);
        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            target_distance: 0.0,
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: false,
        };

        self.query_pipeline
            .cast_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &shape_pos,
                &shape_vel,
                &shape,
                options,
                filter,
            )
            .map(|(collider, _hit)| collider)
    }

    /// All sensor colliders currently intersecting the given collider.
    /// Valid after a physics step (the narrow phase owns the pairs).
    pub fn sensor_overlaps(&self, collider: ColliderHandle) -> Vec<ColliderHandle> {
        let mut overlaps = Vec::new();
        for (c1, c2, intersecting) in self.narrow_phase.intersection_pairs_with(collider) {
            if !intersecting {
                continue;
            }
            let other = if c1 == collider { c2 } else { c1 };
            overlaps.push(other);
        }
        overlaps
    }

    /// First collider in active contact with the given one, if any.
    /// Valid after a physics step.
    pub fn first_contact(&self, collider: ColliderHandle) -> Option<ColliderHandle> {
        self.narrow_phase
            .contact_pairs_with(collider)
            .find(|pair| pair.has_any_active_contact)
            .map(|pair| {
                if pair.collider1 == collider {
                    pair.collider2
                } else {
                    pair.collider1
                }
            })
    }
}
