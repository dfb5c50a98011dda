//! Input handling for keyboard and mouse.
//!
//! `InputState` collects winit events into per-frame pressed/held/released
//! sets, and exposes the named actions the gameplay code reads (move axis,
//! jump, crouch, fire, mode switch, etc.). Bindings live here so gameplay
//! never touches raw key codes.

use glam::Vec2;
use std::collections::HashSet;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,
    /// Mouse buttons released this frame.
    mouse_released: HashSet<MouseButton>,

    /// Mouse movement delta this frame.
    mouse_delta: Vec2,
    /// Accumulated mouse delta (drained into `mouse_delta` on begin_frame).
    accumulated_delta: Vec2,

    /// Mouse scroll state for this frame.
    scroll_up: bool,
    scroll_down: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
        self.scroll_up = false;
        self.scroll_down = false;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.contains(&button) {
                    self.mouse_pressed.insert(button);
                }
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
                self.mouse_released.insert(button);
            }
        }
    }

    /// Process raw mouse movement.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        self.accumulated_delta.x += delta.0 as f32;
        self.accumulated_delta.y += delta.1 as f32;
    }

    /// Process a scroll wheel tick.
    pub fn process_scroll(&mut self, up: bool) {
        if up {
            self.scroll_up = true;
        } else {
            self.scroll_down = true;
        }
    }

    // ── Raw queries ────────────────────────────────────────────────────────

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Check if a mouse button is held.
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Check if a mouse button was released this frame.
    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_released.contains(&button)
    }

    // ── Named actions ──────────────────────────────────────────────────────

    /// Movement input as a normalized 2D axis (WASD). `y` is forward.
    pub fn move_axis(&self) -> Vec2 {
        let mut movement = Vec2::ZERO;

        if self.is_key_held(KeyCode::KeyW) {
            movement.y += 1.0;
        }
        if self.is_key_held(KeyCode::KeyS) {
            movement.y -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyA) {
            movement.x -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyD) {
            movement.x += 1.0;
        }

        if movement.length_squared() > 0.0 {
            movement = movement.normalize();
        }

        movement
    }

    /// Jump edge (Space).
    pub fn jump_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Space)
    }

    /// Jump level, for variable jump height ("jump cut" on release).
    pub fn jump_held(&self) -> bool {
        self.is_key_held(KeyCode::Space)
    }

    /// Crouch edge (Ctrl), used in toggle-crouch mode.
    pub fn crouch_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::ControlLeft) || self.is_key_pressed(KeyCode::ControlRight)
    }

    /// Crouch level, used in hold-crouch mode.
    pub fn crouch_held(&self) -> bool {
        self.is_key_held(KeyCode::ControlLeft) || self.is_key_held(KeyCode::ControlRight)
    }

    /// Sprint level (Shift).
    pub fn sprint_held(&self) -> bool {
        self.is_key_held(KeyCode::ShiftLeft) || self.is_key_held(KeyCode::ShiftRight)
    }

    /// Interact edge (E): pickups, climb toggle.
    pub fn interact_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyE)
    }

    /// Tool fire edge (left mouse).
    pub fn fire_pressed(&self) -> bool {
        self.is_mouse_pressed(MouseButton::Left)
    }

    /// Tool fire release edge (left mouse) — ends a blaster charge.
    pub fn fire_released(&self) -> bool {
        self.is_mouse_released(MouseButton::Left)
    }

    /// Tool mode switch edge (Q).
    pub fn switch_mode_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyQ)
    }

    /// Size change edge (X).
    pub fn change_size_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyX)
    }

    /// Held-object rotation mode level (right mouse).
    pub fn rotate_object_held(&self) -> bool {
        self.is_mouse_held(MouseButton::Right)
    }

    /// Hold-distance axis for the move-objects tool: scroll up pushes the
    /// held object away, scroll down pulls it closer.
    pub fn object_distance_axis(&self) -> f32 {
        match (self.scroll_up, self.scroll_down) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    /// Pointer movement delta for this frame (look / object rotation).
    pub fn pointer_delta(&self) -> Vec2 {
        self.mouse_delta
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
