//! Orbital motion of belt asteroids around their frozen pivot.

use glam::{Quat, Vec3};
use hecs::World;

use starbelt_core::components::{Asteroid, BeltObject};
use starbelt_core::constants::ORBIT_ANGULAR_SCALE;
use starbelt_core::types::Transform;

/// Advance every belt asteroid along its orbit.
pub fn run(world: &mut World, dt: f32) {
    for (_entity, (_asteroid, transform, belt_object)) in
        world.query_mut::<(&Asteroid, &mut Transform, &BeltObject)>()
    {
        transform.position = orbit_step(transform.position, belt_object, dt);
    }
}

/// Rotate `position` about the pivot by `orbit_speed * dt * ORBIT_ANGULAR_SCALE`
/// radians, around `parent_up` (or its negation when not clockwise).
/// A zero axis leaves the position unchanged.
pub fn orbit_step(position: Vec3, belt_object: &BeltObject, dt: f32) -> Vec3 {
    let up = if belt_object.clockwise {
        belt_object.parent_up
    } else {
        -belt_object.parent_up
    };
    let axis = up.normalize_or_zero();
    if axis == Vec3::ZERO {
        return position;
    }

    let angle = belt_object.orbit_speed * dt * ORBIT_ANGULAR_SCALE;
    let pivot = belt_object.parent_position;
    pivot + Quat::from_axis_angle(axis, angle) * (position - pivot)
}
