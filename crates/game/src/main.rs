//! tinyspace — headless demo of the player-interaction core.
//!
//! Builds a small arena (ground, walls, crates, pickups, a practice
//! target) and drives the game loop with a scripted input sequence:
//! collect the arm cannon, walk and jump, grab and park a crate, convert
//! a wall and the floor, then charge and fire the blaster. Events the
//! presentation layer would consume are logged instead.

mod arm_cannon;
mod blaster;
mod config;
mod events;
mod locomotion;
mod modify_surfaces;
mod move_objects;
mod object_pool;
mod pickup;
mod projectile;
mod state;
mod surfaces;
mod update;
mod world;

use engine_core::Vec3;
use input::{ElementState, KeyCode, MouseButton};

use crate::arm_cannon::ToolMode;
use crate::config::GameConfig;
use crate::state::GameState;
use crate::world::SurfaceKind;

/// One scripted input event, applied at the start of its frame.
enum ScriptEvent {
    Key(KeyCode, ElementState),
    Mouse(MouseButton, ElementState),
    Scroll(bool),
    Motion(f64, f64),
}

fn script() -> Vec<(u64, ScriptEvent)> {
    use ElementState::{Pressed, Released};
    use ScriptEvent::*;

    vec![
        // Collect the weapon and every mode pickup at the spawn pad.
        (30, Key(KeyCode::KeyE, Pressed)),
        (31, Key(KeyCode::KeyE, Released)),
        // Walk toward the crate, sprint briefly, jump once.
        (40, Key(KeyCode::KeyW, Pressed)),
        (45, Key(KeyCode::ShiftLeft, Pressed)),
        (55, Key(KeyCode::ShiftLeft, Released)),
        (60, Key(KeyCode::KeyW, Released)),
        (65, Key(KeyCode::Space, Pressed)),
        (66, Key(KeyCode::Space, Released)),
        // Grab the crate dead ahead, push it out, rotate it, park it.
        (100, Mouse(MouseButton::Left, Pressed)),
        (101, Mouse(MouseButton::Left, Released)),
        (110, Scroll(true)),
        (115, Scroll(true)),
        (120, Mouse(MouseButton::Right, Pressed)),
        (125, Motion(40.0, 0.0)),
        (130, Motion(0.0, 25.0)),
        (135, Mouse(MouseButton::Right, Released)),
        (150, Mouse(MouseButton::Left, Pressed)),
        (151, Mouse(MouseButton::Left, Released)),
        // Switch to modify-surfaces; convert the far wall, then the floor.
        (160, Key(KeyCode::KeyQ, Pressed)),
        (161, Key(KeyCode::KeyQ, Released)),
        (170, Mouse(MouseButton::Left, Pressed)),
        (171, Mouse(MouseButton::Left, Released)),
        (180, Motion(0.0, 320.0)), // look down at the floor
        (190, Mouse(MouseButton::Left, Pressed)),
        (191, Mouse(MouseButton::Left, Released)),
        (200, Motion(0.0, -320.0)), // look back up
        // Switch to the blaster; hold a full two-second charge.
        (210, Key(KeyCode::KeyQ, Pressed)),
        (211, Key(KeyCode::KeyQ, Released)),
        (220, Mouse(MouseButton::Left, Pressed)),
        (345, Mouse(MouseButton::Left, Released)),
        // Shrink, wait out the blend, grow back.
        (380, Key(KeyCode::KeyX, Pressed)),
        (381, Key(KeyCode::KeyX, Released)),
        (460, Key(KeyCode::KeyX, Pressed)),
        (461, Key(KeyCode::KeyX, Released)),
    ]
}

fn build_arena(state: &mut GameState) {
    state.spawn_ground();

    // Perimeter walls; the near one doubles as the climb/convert target.
    for (pos, half) in [
        (Vec3::new(0.0, 3.0, -20.0), Vec3::new(20.0, 3.0, 0.5)),
        (Vec3::new(0.0, 3.0, 20.0), Vec3::new(20.0, 3.0, 0.5)),
        (Vec3::new(-20.0, 3.0, 0.0), Vec3::new(0.5, 3.0, 20.0)),
        (Vec3::new(20.0, 3.0, 0.0), Vec3::new(0.5, 3.0, 20.0)),
    ] {
        state.spawn_surface(SurfaceKind::Wall, pos, half, Vec3::splat(0.6));
    }

    state.spawn_movable_crate(Vec3::new(0.0, 1.2, -4.0), 1.0);
    state.spawn_movable_crate(Vec3::new(3.0, 0.6, -6.0), 0.5);
    state.spawn_movable_crate(Vec3::new(-3.0, 0.6, -6.0), 0.5);

    state.spawn_target(Vec3::new(6.0, 1.0, -15.0), 100.0);

    // Spawn pad: the arm cannon plus all three mode unlocks.
    pickup::spawn_weapon_pickup(&mut state.world, &mut state.physics, Vec3::new(0.0, 1.0, 0.0));
    for mode in [
        ToolMode::MoveObjects,
        ToolMode::ModifySurfaces,
        ToolMode::Blaster,
    ] {
        pickup::spawn_mode_pickup(
            &mut state.world,
            &mut state.physics,
            Vec3::new(0.0, 1.0, 0.0),
            mode,
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut state = GameState::new(GameConfig::load());
    log::info!(
        "tinyspace demo starting ({} Hz fixed step)",
        state.config.fixed_rate_hz
    );
    build_arena(&mut state);

    let script = script();
    let total_frames = 520u64;
    let frame_dt = 1.0 / 60.0;

    for frame in 0..total_frames {
        state.input.begin_frame();
        for (_, event) in script.iter().filter(|(at, _)| *at == frame) {
            match event {
                ScriptEvent::Key(key, element_state) => {
                    state.input.process_keyboard(*key, *element_state)
                }
                ScriptEvent::Mouse(button, element_state) => {
                    state.input.process_mouse_button(*button, *element_state)
                }
                ScriptEvent::Scroll(up) => state.input.process_scroll(*up),
                ScriptEvent::Motion(x, y) => state.input.process_mouse_motion((*x, *y)),
            }
        }

        state.time.advance(frame_dt);
        state.update();

        for event in state.drain_events() {
            log::info!("[frame {:>3}] {:?}", frame, event);
        }
    }

    log::info!(
        "demo complete: mode={:?} held={:?} ring={} surfaces={} pool={} ({} free)",
        state.arm_cannon.current_mode(),
        state.arm_cannon.move_objects().held_entity(),
        state.arm_cannon.move_objects().ring_len(),
        state.arm_cannon.surface_ledger().len(),
        state.pool.spawned_count(),
        state.pool.free_count(),
    );

    Ok(())
}
