//! Steering-force primitive shared by every flocking term.

use glam::Vec3;

use starbelt_core::components::BoidSettings;

/// Force steering `velocity` towards `direction` at full speed.
///
/// The direction is normalised first (zero stays zero), the velocity
/// difference is clamped to `max_steer_force`, then scaled by `weight`.
pub fn steer_towards(direction: Vec3, velocity: Vec3, settings: &BoidSettings, weight: f32) -> Vec3 {
    let desired = direction.normalize_or_zero() * settings.max_speed;
    (desired - velocity).clamp_length_max(settings.max_steer_force) * weight
}
