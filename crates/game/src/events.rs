//! Outward notifications for the presentation layer.
//!
//! The HUD, audio, and VFX systems are out of scope here; they drain this
//! queue once per frame and react. Nothing in the core reads it back.

use crate::arm_cannon::ToolMode;
use crate::world::SurfaceKind;
use hecs::Entity;

/// One gameplay event the host may want to present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// The arm cannon was equipped for the first time.
    WeaponEnabled,
    /// A tool mode became available.
    ModeUnlocked(ToolMode),
    /// The active tool mode changed (switch or first unlock).
    ModeChanged(ToolMode),
    /// Player entered a pickup's prompt region.
    PickupPromptShown(Entity),
    /// Player left a pickup's prompt region.
    PickupPromptHidden(Entity),
    /// A surface gained a behavior (recolored as a marker).
    SurfaceModified { surface: Entity, kind: SurfaceKind },
    /// A surface was evicted from the ledger and restored.
    SurfaceReverted(Entity),
    /// A projectile hit something.
    ProjectileImpact { target: Option<Entity> },
    /// A damageable entity took projectile damage.
    Damaged { entity: Entity, amount: f32 },
}

/// FIFO event queue owned by `GameState`, drained by the host each frame.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Peek at pending events without draining (tests, debug overlay).
    pub fn pending(&self) -> &[GameEvent] {
        &self.events
    }
}
