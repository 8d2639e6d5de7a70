//! Player motion integrator.

use glam::{Quat, Vec3};
use hecs::World;

use starbelt_core::components::PlayerMove;
use starbelt_core::types::Transform;

/// Turn and move every moveable ship.
///
/// Rotations are applied in ship space: yaw about local Y, then pitch about
/// local X, then roll about local Z, each at `turn_speed` rad/s. The ship
/// then advances along its new forward.
pub fn run(world: &mut World, dt: f32) {
    for (_entity, (transform, movement)) in world.query_mut::<(&mut Transform, &PlayerMove)>() {
        if !movement.moveable {
            continue;
        }
        transform.rotation = turn(transform.rotation, movement.rotation, movement.turn_speed * dt);

        let forward = transform.rotation * Vec3::Z;
        transform.position += forward * movement.forward_speed * movement.forward_factor * dt;
    }
}

/// `intent` is (roll, pitch, yaw); `step` is the angle of one full unit.
fn turn(rotation: Quat, intent: Vec3, step: f32) -> Quat {
    let mut rotation = rotation;

    let yaw = step * intent.z;
    if yaw != 0.0 {
        rotation *= Quat::from_rotation_y(yaw);
    }
    let pitch = step * intent.y;
    if pitch != 0.0 {
        rotation *= Quat::from_rotation_x(pitch);
    }
    let roll = step * intent.x;
    if roll != 0.0 {
        rotation *= Quat::from_rotation_z(roll);
    }

    rotation.normalize()
}
