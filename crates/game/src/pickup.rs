//! Pickups: the arm cannon itself, and per-mode unlock stations.
//!
//! Each pickup is a sensor region. Standing inside shows a prompt (as an
//! event for the out-of-scope UI); pressing Interact inside consumes the
//! pickup, grants its reward, and despawns it.

use engine_core::{Tint, Transform, Vec3, Visibility, World};
use hecs::Entity;
use input::InputState;
use physics::{ColliderHandle, PhysicsWorld};

use crate::arm_cannon::{ArmCannon, ToolMode};
use crate::events::{EventQueue, GameEvent};

/// Grants the arm cannon when consumed.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeaponPickup;

/// Unlocks one tool mode when consumed.
#[derive(Debug, Clone, Copy)]
pub struct ModeUnlockPickup {
    pub mode: ToolMode,
}

/// Sensor region + prompt state shared by every pickup kind.
#[derive(Debug, Clone, Copy)]
pub struct PickupRegion {
    pub sensor: ColliderHandle,
    player_inside: bool,
}

/// Spawn the weapon pickup at a position.
pub fn spawn_weapon_pickup(world: &mut World, physics: &mut PhysicsWorld, position: Vec3) -> Entity {
    let sensor = physics.add_sensor_cuboid(position, Vec3::splat(1.0));
    world.spawn((
        Transform::from_position(position),
        Tint::new(Vec3::new(1.0, 0.8, 0.1)),
        Visibility::shown(),
        WeaponPickup,
        PickupRegion {
            sensor,
            player_inside: false,
        },
    ))
}

/// Spawn a mode-unlock pickup at a position.
pub fn spawn_mode_pickup(
    world: &mut World,
    physics: &mut PhysicsWorld,
    position: Vec3,
    mode: ToolMode,
) -> Entity {
    let sensor = physics.add_sensor_cuboid(position, Vec3::splat(1.0));
    world.spawn((
        Transform::from_position(position),
        Tint::new(Vec3::new(0.6, 0.3, 1.0)),
        Visibility::shown(),
        ModeUnlockPickup { mode },
        PickupRegion {
            sensor,
            player_inside: false,
        },
    ))
}

/// Per-frame pickup logic: prompt enter/exit events and Interact
/// consumption. Runs in the frame domain against the last physics step's
/// overlap state.
pub fn update_pickups(
    world: &mut World,
    physics: &mut PhysicsWorld,
    player_collider: ColliderHandle,
    input: &InputState,
    cannon: &mut ArmCannon,
    events: &mut EventQueue,
) {
    let overlaps = physics.sensor_overlaps(player_collider);
    let mut consumed: Vec<(Entity, ColliderHandle)> = Vec::new();

    for (entity, region) in world.query_mut::<&mut PickupRegion>() {
        let inside = overlaps.contains(&region.sensor);
        if inside && !region.player_inside {
            events.push(GameEvent::PickupPromptShown(entity));
        } else if !inside && region.player_inside {
            events.push(GameEvent::PickupPromptHidden(entity));
        }
        region.player_inside = inside;

        if inside && input.interact_pressed() {
            consumed.push((entity, region.sensor));
        }
    }

    // Consume in spawn order so overlapping pickups grant deterministically
    // (the first mode unlocked becomes the selected mode).
    consumed.sort_unstable_by_key(|(entity, _)| *entity);

    for (entity, sensor) in consumed {
        if world.get::<&WeaponPickup>(entity).is_ok() {
            cannon.enable(events);
        }
        let mode = world.get::<&ModeUnlockPickup>(entity).map(|p| p.mode).ok();
        if let Some(mode) = mode {
            cannon.unlock(mode, events);
        }

        events.push(GameEvent::PickupPromptHidden(entity));
        physics.remove_collider(sensor);
        if world.despawn(entity).is_err() {
            log::warn!("Pickup {:?} vanished before despawn", entity);
        }
    }
}
