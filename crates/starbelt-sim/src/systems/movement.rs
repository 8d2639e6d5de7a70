//! Kinematic integration system.
//!
//! Moves every body with a `Velocity`: position += velocity * dt. Driven by
//! the physics step; boids and belt asteroids are moved by their own systems.

use hecs::World;

use starbelt_core::types::{Transform, Velocity};

/// Run kinematic integration for all entities with Transform + Velocity.
pub fn run(world: &mut World, dt: f32) {
    for (_entity, (transform, velocity)) in world.query_mut::<(&mut Transform, &Velocity)>() {
        transform.position += velocity.linear * dt;
    }
}
