//! Obstacle avoidance over a fixed table of escape directions.
//!
//! The table holds quasi-uniform unit vectors on a Fibonacci sphere, built
//! once and shared read-only for the lifetime of the process. When the
//! forward cast hits, the first direction in table order whose own cast is
//! clear wins; ties are never broken by angle to the current heading.

use std::f32::consts::PI;
use std::sync::OnceLock;

use glam::Vec3;

use starbelt_core::components::BoidSettings;
use starbelt_core::constants::AVOIDANCE_DIRECTION_COUNT;

use crate::steering::steer_towards;

static DIRECTIONS: OnceLock<Vec<Vec3>> = OnceLock::new();

/// The shared avoidance direction table.
pub fn avoidance_directions() -> &'static [Vec3] {
    DIRECTIONS.get_or_init(|| fibonacci_sphere(AVOIDANCE_DIRECTION_COUNT))
}

/// `count` unit vectors: inclination `acos(1 - 2i/count)`, azimuth `i * 2π * φ`.
pub fn fibonacci_sphere(count: usize) -> Vec<Vec3> {
    let golden_ratio = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let angle_increment = PI * 2.0 * golden_ratio;

    (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            let inclination = (1.0 - 2.0 * t).acos();
            let azimuth = angle_increment * i as f32;
            Vec3::new(
                inclination.sin() * azimuth.cos(),
                inclination.sin() * azimuth.sin(),
                inclination.cos(),
            )
        })
        .collect()
}

/// First direction in table order for which `is_blocked` reports false.
pub fn first_clear_direction(
    directions: &[Vec3],
    mut is_blocked: impl FnMut(Vec3) -> bool,
) -> Option<Vec3> {
    directions.iter().copied().find(|&dir| !is_blocked(dir))
}

/// Result of the obstacle check for one boid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvoidanceOutcome {
    pub heading_for_collision: bool,
    /// Chosen escape direction, if the forward cast hit and one was clear.
    pub direction: Option<Vec3>,
    pub force: Vec3,
}

/// Cast forward; on a hit, steer towards the first clear table direction.
///
/// `is_blocked(dir)` performs the sphere cast along `dir`.
pub fn avoid_obstacles(
    forward: Vec3,
    velocity: Vec3,
    settings: &BoidSettings,
    directions: &[Vec3],
    mut is_blocked: impl FnMut(Vec3) -> bool,
) -> AvoidanceOutcome {
    if !is_blocked(forward) {
        return AvoidanceOutcome {
            heading_for_collision: false,
            direction: None,
            force: Vec3::ZERO,
        };
    }

    match first_clear_direction(directions, &mut is_blocked) {
        Some(dir) => {
            // Table entries are unit length; the fallback covers a hand-built table.
            let escape = if dir.length_squared() > 0.0 { dir } else { forward };
            AvoidanceOutcome {
                heading_for_collision: true,
                direction: Some(escape),
                force: steer_towards(escape, velocity, settings, settings.collision_avoidance_weight),
            }
        }
        None => AvoidanceOutcome {
            heading_for_collision: true,
            direction: None,
            force: Vec3::ZERO,
        },
    }
}
