//! Arm-cannon mode controller: owns which tool mode is active and
//! unlocked, and routes fire/release input to the right handler.

use engine_core::{Transform, World};
use input::InputState;
use physics::PhysicsWorld;
use std::collections::HashSet;

use crate::blaster::{BlasterConfig, BlasterHandler};
use crate::events::{EventQueue, GameEvent};
use crate::locomotion::PlayerLocomotion;
use crate::modify_surfaces::{ModifySurfacesConfig, ModifySurfacesHandler, SurfaceLedger};
use crate::move_objects::{MoveObjectsConfig, MoveObjectsHandler};
use crate::object_pool::ProjectilePool;
use crate::world::ColliderMap;

/// The three mutually exclusive tool modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolMode {
    MoveObjects,
    ModifySurfaces,
    Blaster,
}

impl ToolMode {
    pub const ALL: [ToolMode; 3] = [
        ToolMode::MoveObjects,
        ToolMode::ModifySurfaces,
        ToolMode::Blaster,
    ];

    /// Next mode in the cycle order.
    fn next(self) -> Self {
        match self {
            ToolMode::MoveObjects => ToolMode::ModifySurfaces,
            ToolMode::ModifySurfaces => ToolMode::Blaster,
            ToolMode::Blaster => ToolMode::MoveObjects,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolMode::MoveObjects => "Move Objects",
            ToolMode::ModifySurfaces => "Modify Surfaces",
            ToolMode::Blaster => "Blaster",
        }
    }
}

/// Tuning for the arm cannon and its three handlers.
#[derive(Debug, Clone, Default)]
pub struct ArmCannonConfig {
    pub move_objects: MoveObjectsConfig,
    pub modify_surfaces: ModifySurfacesConfig,
    pub blaster: BlasterConfig,
}

/// The player's multi-mode tool.
pub struct ArmCannon {
    enabled: bool,
    current_mode: ToolMode,
    unlocked: HashSet<ToolMode>,
    move_objects: MoveObjectsHandler,
    modify_surfaces: ModifySurfacesHandler,
    blaster: BlasterHandler,
}

impl ArmCannon {
    pub fn new(config: ArmCannonConfig) -> Self {
        Self {
            enabled: false,
            current_mode: ToolMode::MoveObjects,
            unlocked: HashSet::new(),
            move_objects: MoveObjectsHandler::new(config.move_objects),
            modify_surfaces: ModifySurfacesHandler::new(config.modify_surfaces),
            blaster: BlasterHandler::new(config.blaster),
        }
    }

    /// Equip the weapon (weapon pickup). Emits once.
    pub fn enable(&mut self, events: &mut EventQueue) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        events.push(GameEvent::WeaponEnabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn current_mode(&self) -> ToolMode {
        self.current_mode
    }

    pub fn is_unlocked(&self, mode: ToolMode) -> bool {
        self.unlocked.contains(&mode)
    }

    /// The modify-surfaces ledger, read by locomotion for climb regions
    /// and bounce multipliers.
    pub fn surface_ledger(&self) -> &SurfaceLedger {
        self.modify_surfaces.ledger()
    }

    pub fn move_objects(&self) -> &MoveObjectsHandler {
        &self.move_objects
    }

    /// Make a mode available. The first unlock also selects it.
    pub fn unlock(&mut self, mode: ToolMode, events: &mut EventQueue) {
        if !self.unlocked.insert(mode) {
            return;
        }
        events.push(GameEvent::ModeUnlocked(mode));
        if self.unlocked.len() == 1 {
            self.current_mode = mode;
            events.push(GameEvent::ModeChanged(mode));
        }
    }

    /// Cycle forward to the next unlocked mode, skipping locked ones.
    /// No-op (and no event) when nothing is unlocked or only the current
    /// mode is.
    pub fn switch_mode(&mut self, events: &mut EventQueue) {
        if self.unlocked.is_empty() {
            return;
        }
        let mut candidate = self.current_mode.next();
        for _ in 0..ToolMode::ALL.len() {
            if self.unlocked.contains(&candidate) {
                break;
            }
            candidate = candidate.next();
        }
        if candidate != self.current_mode {
            self.current_mode = candidate;
            events.push(GameEvent::ModeChanged(candidate));
        }
    }

    /// Per-frame driver: reads tool input edges and ticks the active
    /// handler. Exactly one handler runs per frame.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        input: &InputState,
        tool: &Transform,
        world: &mut World,
        physics: &mut PhysicsWorld,
        colliders: &ColliderMap,
        pool: &mut ProjectilePool,
        player: &mut PlayerLocomotion,
        events: &mut EventQueue,
        dt: f32,
    ) {
        if !self.enabled {
            return;
        }

        if input.switch_mode_pressed() {
            self.switch_mode(events);
        }
        if input.fire_pressed() {
            self.fire(tool, world, physics, colliders, pool, player, events);
        }
        if input.fire_released() {
            self.release_fire(tool, world, physics);
        }

        if !self.is_unlocked(self.current_mode) {
            return;
        }
        match self.current_mode {
            ToolMode::MoveObjects => {
                self.move_objects
                    .update(input, tool, world, physics, player, dt);
            }
            ToolMode::ModifySurfaces => {}
            ToolMode::Blaster => {
                self.blaster.update(tool, world, physics, dt);
            }
        }
    }

    /// Dispatch a fire edge to the active handler, if that mode is
    /// unlocked. Locked modes absorb the input.
    #[allow(clippy::too_many_arguments)]
    pub fn fire(
        &mut self,
        tool: &Transform,
        world: &mut World,
        physics: &mut PhysicsWorld,
        colliders: &ColliderMap,
        pool: &mut ProjectilePool,
        player: &PlayerLocomotion,
        events: &mut EventQueue,
    ) {
        if !self.enabled || !self.is_unlocked(self.current_mode) {
            log::debug!("Fire ignored: mode {:?} not available", self.current_mode);
            return;
        }
        match self.current_mode {
            ToolMode::MoveObjects => {
                self.move_objects
                    .try_grab(tool, world, physics, colliders, player.body);
            }
            ToolMode::ModifySurfaces => {
                self.modify_surfaces
                    .modify_surface(tool, world, physics, colliders, events);
            }
            ToolMode::Blaster => {
                self.blaster.start_charging(tool, world, physics, pool);
            }
        }
    }

    /// Dispatch a fire-release edge. Only the blaster cares.
    pub fn release_fire(&mut self, tool: &Transform, world: &mut World, physics: &mut PhysicsWorld) {
        if self.current_mode == ToolMode::Blaster && self.is_unlocked(ToolMode::Blaster) {
            self.blaster.fire_charged_shot(tool, world, physics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cannon() -> (ArmCannon, EventQueue) {
        (ArmCannon::new(ArmCannonConfig::default()), EventQueue::new())
    }

    #[test]
    fn switch_with_nothing_unlocked_is_a_no_op() {
        let (mut cannon, mut events) = cannon();
        let before = cannon.current_mode();
        cannon.switch_mode(&mut events);
        assert_eq!(cannon.current_mode(), before);
        assert!(events.is_empty());
    }

    #[test]
    fn first_unlock_selects_the_mode() {
        let (mut cannon, mut events) = cannon();
        cannon.unlock(ToolMode::Blaster, &mut events);
        assert_eq!(cannon.current_mode(), ToolMode::Blaster);
        assert_eq!(
            events.drain(),
            vec![
                GameEvent::ModeUnlocked(ToolMode::Blaster),
                GameEvent::ModeChanged(ToolMode::Blaster),
            ]
        );
    }

    #[test]
    fn unlocking_twice_emits_once() {
        let (mut cannon, mut events) = cannon();
        cannon.unlock(ToolMode::MoveObjects, &mut events);
        events.drain();
        cannon.unlock(ToolMode::MoveObjects, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn switch_skips_locked_modes() {
        let (mut cannon, mut events) = cannon();
        cannon.unlock(ToolMode::MoveObjects, &mut events);
        cannon.unlock(ToolMode::Blaster, &mut events);
        events.drain();

        // ModifySurfaces is locked; the cycle jumps straight to Blaster.
        cannon.switch_mode(&mut events);
        assert_eq!(cannon.current_mode(), ToolMode::Blaster);
        assert_eq!(events.drain(), vec![GameEvent::ModeChanged(ToolMode::Blaster)]);

        // And wraps back around.
        cannon.switch_mode(&mut events);
        assert_eq!(cannon.current_mode(), ToolMode::MoveObjects);
    }

    #[test]
    fn switch_with_single_unlocked_mode_emits_nothing() {
        let (mut cannon, mut events) = cannon();
        cannon.unlock(ToolMode::ModifySurfaces, &mut events);
        events.drain();
        cannon.switch_mode(&mut events);
        assert_eq!(cannon.current_mode(), ToolMode::ModifySurfaces);
        assert!(events.is_empty());
    }

    #[test]
    fn enable_emits_once() {
        let (mut cannon, mut events) = cannon();
        assert!(!cannon.is_enabled());
        cannon.enable(&mut events);
        cannon.enable(&mut events);
        assert!(cannon.is_enabled());
        assert_eq!(events.drain(), vec![GameEvent::WeaponEnabled]);
    }

    #[test]
    fn fire_with_locked_mode_is_absorbed() {
        let (mut cannon, mut events) = cannon();
        cannon.enable(&mut events);
        events.drain();

        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let mut pool = ProjectilePool::new();
        let colliders = ColliderMap::new();
        let player = PlayerLocomotion::new(
            crate::locomotion::LocomotionConfig::default(),
            &mut physics,
            engine_core::Vec3::new(0.0, 1.0, 0.0),
        );
        let tool = Transform::default();

        // Nothing unlocked: a fire edge changes nothing.
        cannon.fire(
            &tool,
            &mut world,
            &mut physics,
            &colliders,
            &mut pool,
            &player,
            &mut events,
        );
        assert_eq!(pool.spawned_count(), 0);
        assert!(events.is_empty());
    }
}
