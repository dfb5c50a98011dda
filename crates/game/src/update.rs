//! Per-frame and fixed-step update logic for `GameState`.
//!
//! Frame domain: input edges, tool dispatch, timed blends, pickup
//! prompts. Fixed domain: locomotion integration, the physics step, and
//! projectile flight. The `Time` accumulator decides how many fixed steps
//! a frame drains.

use engine_core::Transform;
use physics::PhysicsBody;

use crate::pickup::update_pickups;
use crate::projectile::update_projectiles;
use crate::state::GameState;

/// Run one frame of gameplay. Called from `GameState::update()`.
pub fn frame(state: &mut GameState) {
    let dt = state.time.delta_seconds();
    let now = state.time.elapsed_seconds();
    let tool = state.tool_transform();

    {
        let GameState {
            world,
            physics,
            colliders,
            input,
            player,
            arm_cannon,
            pool,
            events,
            ..
        } = state;

        player.frame_update(input, physics, now, dt);
        update_pickups(world, physics, player.collider, input, arm_cannon, events);
        arm_cannon.update(
            input, &tool, world, physics, colliders, pool, player, events, dt,
        );
    }

    while state.time.should_fixed_update() {
        fixed_step(state, now);
    }
}

/// One fixed physics step.
fn fixed_step(state: &mut GameState, now: f32) {
    let dt = state.time.fixed_timestep_seconds();
    let GameState {
        world,
        physics,
        colliders,
        input,
        player,
        arm_cannon,
        pool,
        events,
        ..
    } = state;

    player.fixed_update(
        input,
        physics,
        world,
        colliders,
        arm_cannon.surface_ledger(),
        now,
        dt,
    );
    physics.step();
    update_projectiles(world, physics, colliders, pool, events, dt);

    // Mirror body state back into render transforms for dynamic entities.
    for (_, (transform, body)) in world.query_mut::<(&mut Transform, &PhysicsBody)>() {
        if let Some(t) = physics.body_transform(body.rigid_body) {
            transform.position = t.position;
            transform.rotation = t.rotation;
        }
    }
}
