//! World entity classification and collider→entity resolution.
//!
//! Raycasts come back as collider handles; gameplay wants entities and
//! their typed capabilities. `ColliderMap` is the bridge, and the small
//! marker components here replace string tag comparisons.

use hecs::Entity;
use physics::ColliderHandle;
use std::collections::HashMap;

/// Classification of a static world surface. Drives what the modify tool
/// turns it into: walls become climbable, floors become bouncy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Wall,
    Floor,
}

/// Capability marker: this entity can be grabbed by the move-objects tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Movable;

/// Maps collider handles back to the entities that own them.
#[derive(Debug, Default)]
pub struct ColliderMap {
    entities: HashMap<ColliderHandle, Entity>,
}

impl ColliderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collider: ColliderHandle, entity: Entity) {
        self.entities.insert(collider, entity);
    }

    pub fn remove(&mut self, collider: ColliderHandle) {
        self.entities.remove(&collider);
    }

    /// Resolve a collider to its owning entity.
    pub fn entity(&self, collider: ColliderHandle) -> Option<Entity> {
        self.entities.get(&collider).copied()
    }
}
