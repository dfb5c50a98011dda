//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static world surfaces (floors, walls).
    Environment = 1 << 0,
    /// Player character.
    Player = 1 << 1,
    /// Grabbable physics objects.
    Movable = 1 << 2,
    /// Blaster projectiles.
    Projectile = 1 << 3,
    /// Trigger regions (climb volumes, pickup prompts).
    Sensor = 1 << 4,
}

impl CollisionGroup {
    /// Membership/filter pair for static environment: collides with everything solid.
    pub fn environment() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Environment as u32);
        let filter = Group::ALL;
        (membership, filter)
    }

    /// Membership/filter pair for the player body.
    pub fn player() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Player as u32);
        let filter = Group::from_bits_retain(
            Self::Environment as u32 | Self::Movable as u32 | Self::Sensor as u32,
        );
        (membership, filter)
    }

    /// Membership/filter pair for movable objects.
    pub fn movable() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Movable as u32);
        let filter = Group::from_bits_retain(
            Self::Environment as u32 | Self::Player as u32 | Self::Movable as u32,
        );
        (membership, filter)
    }

    /// Membership/filter pair for projectiles. They pass through the player.
    pub fn projectile() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Projectile as u32);
        let filter = Group::from_bits_retain(Self::Environment as u32 | Self::Movable as u32);
        (membership, filter)
    }

    /// Membership/filter pair for sensor regions: they only notice the player.
    pub fn sensor() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Sensor as u32);
        let filter = Group::from_bits_retain(Self::Player as u32);
        (membership, filter)
    }
}

/// Component linking an ECS entity to its physics handles.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub rigid_body: RigidBodyHandle,
    pub collider: Option<ColliderHandle>,
}

impl PhysicsBody {
    pub fn new(rigid_body: RigidBodyHandle) -> Self {
        Self {
            rigid_body,
            collider: None,
        }
    }

    pub fn with_collider(rigid_body: RigidBodyHandle, collider: ColliderHandle) -> Self {
        Self {
            rigid_body,
            collider: Some(collider),
        }
    }
}
