//! Time management for the game loop.
//!
//! Two scheduling domains hang off this: the variable-rate frame step
//! (delta time) and the fixed-rate physics step (accumulator). Headless
//! runs and tests drive the clock manually with [`Time::advance`].

use std::time::Instant;

/// Manages frame timing, delta time, and the fixed-update accumulator.
#[derive(Debug)]
pub struct Time {
    /// Time of the last frame (wall clock; unused when driven manually).
    last_frame: Instant,
    /// Duration of the last frame, seconds.
    delta: f32,
    /// Total elapsed time since start, seconds.
    elapsed: f32,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed timestep for physics, seconds (default 60 Hz).
    fixed_timestep: f32,
    /// Accumulated time for fixed updates, seconds.
    accumulator: f32,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: 0.0,
            elapsed: 0.0,
            frame_count: 0,
            fixed_timestep: 1.0 / 60.0,
            accumulator: 0.0,
        }
    }

    /// Update timing from the wall clock at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.tick(dt);
    }

    /// Advance the clock by an explicit delta. Used by the headless demo
    /// and tests so frame timing is deterministic.
    pub fn advance(&mut self, dt: f32) {
        self.last_frame = Instant::now();
        self.tick(dt);
    }

    fn tick(&mut self, dt: f32) {
        self.delta = dt;
        self.elapsed += dt;
        self.frame_count += 1;
        self.accumulator += dt;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            true
        } else {
            false
        }
    }

    /// Set the fixed timestep rate in Hz.
    pub fn set_fixed_rate(&mut self, hz: f32) {
        self.fixed_timestep = 1.0 / hz;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_fixed_steps() {
        let mut t = Time::new();
        // Three frames of 1/60 should yield exactly three fixed steps at 60 Hz.
        let mut steps = 0;
        for _ in 0..3 {
            t.advance(1.0 / 60.0);
            while t.should_fixed_update() {
                steps += 1;
            }
        }
        assert_eq!(steps, 3);
    }

    #[test]
    fn long_frame_drains_multiple_fixed_steps() {
        let mut t = Time::new();
        t.advance(4.5 / 60.0);
        let mut steps = 0;
        while t.should_fixed_update() {
            steps += 1;
        }
        assert_eq!(steps, 4);
    }

    #[test]
    fn elapsed_and_frame_count_track_advances() {
        let mut t = Time::new();
        t.advance(0.25);
        t.advance(0.25);
        assert!((t.elapsed_seconds() - 0.5).abs() < 1e-6);
        assert_eq!(t.frame_count(), 2);
    }
}
