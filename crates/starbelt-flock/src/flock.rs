//! Per-boid flocking update.
//!
//! Pure functions over plain data. The caller supplies a read-only snapshot
//! of the whole flock and a cast closure for obstacle queries, so every boid
//! can be updated independently and in parallel. No ECS dependency.

use glam::Vec3;

use starbelt_core::components::{BoidSettings, BoidState};
use starbelt_core::types::{look_rotation, Transform};

use crate::avoidance::avoid_obstacles;
use crate::steering::steer_towards;

/// Snapshot entry for one flock member, taken before any boid moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    pub position: Vec3,
    pub forward: Vec3,
}

/// Input to the flocking update for a single boid.
pub struct BoidContext<'a> {
    pub transform: Transform,
    pub state: BoidState,
    pub settings: &'a BoidSettings,
    /// Player position the flock chases.
    pub target: Vec3,
    pub dt: f32,
}

/// Output of the flocking update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidUpdate {
    pub transform: Transform,
    pub state: BoidState,
}

/// Run one full update: neighbour scan, avoidance, steering, integration.
///
/// `is_blocked(dir)` sphere-casts from the boid along `dir`.
pub fn update_boid(
    ctx: &BoidContext,
    flock: &[Neighbour],
    directions: &[Vec3],
    is_blocked: impl FnMut(Vec3) -> bool,
) -> BoidUpdate {
    let mut state = scan_neighbours(&ctx.state, ctx.transform.position, flock, ctx.settings);

    let avoidance = avoid_obstacles(
        ctx.transform.forward(),
        state.velocity,
        ctx.settings,
        directions,
        is_blocked,
    );
    state.heading_for_collision = avoidance.heading_for_collision;
    state.acceleration = avoidance.force;

    let steering = steering_acceleration(&mut state, ctx.transform.position, ctx.target, ctx.settings);
    state.acceleration += steering;

    integrate(&ctx.transform, state, ctx.settings, ctx.dt)
}

/// Reset the per-tick sums and accumulate them over the flock.
///
/// Members at exactly the boid's own position are skipped, which excludes
/// the boid itself from its own snapshot.
pub fn scan_neighbours(
    state: &BoidState,
    position: Vec3,
    flock: &[Neighbour],
    settings: &BoidSettings,
) -> BoidState {
    let mut out = BoidState {
        velocity: state.velocity,
        ..BoidState::default()
    };

    let perception_sq = settings.perception_radius * settings.perception_radius;
    let avoidance_sq = settings.avoidance_radius * settings.avoidance_radius;

    for other in flock {
        let offset = other.position - position;
        let sqr_dst = offset.length_squared();
        if sqr_dst == 0.0 || sqr_dst >= perception_sq {
            continue;
        }

        out.num_flockmates += 1.0;
        out.flock_heading += other.forward;
        out.flock_centre += other.position;

        if sqr_dst < avoidance_sq {
            out.avoidance_heading -= offset / sqr_dst;
        }
    }

    out
}

/// Target seek plus, when there are flockmates, alignment, cohesion and separation.
///
/// Turns `flock_centre` from a sum into a mean as a side effect.
pub fn steering_acceleration(
    state: &mut BoidState,
    position: Vec3,
    target: Vec3,
    settings: &BoidSettings,
) -> Vec3 {
    let mut acceleration = steer_towards(target - position, state.velocity, settings, settings.target_weight);

    if state.num_flockmates > 0.0 {
        state.flock_centre /= state.num_flockmates;
        let offset_to_centre = state.flock_centre - position;

        acceleration += steer_towards(state.flock_heading, state.velocity, settings, settings.alignment_weight);
        acceleration += steer_towards(offset_to_centre, state.velocity, settings, settings.cohesion_weight);
        acceleration += steer_towards(state.avoidance_heading, state.velocity, settings, settings.separation_weight);
    }

    acceleration
}

/// Integrate acceleration into velocity, clamp speed and move the boid.
///
/// Speed always ends inside `[min_speed, max_speed]`. A zero velocity keeps
/// the current heading. The new rotation faces the velocity with the old up.
pub fn integrate(transform: &Transform, mut state: BoidState, settings: &BoidSettings, dt: f32) -> BoidUpdate {
    let velocity = state.velocity + state.acceleration * dt;
    let speed = velocity.length();
    let dir = if speed > 0.0 && speed.is_finite() {
        velocity / speed
    } else {
        transform.forward()
    };
    let speed = speed.max(settings.min_speed).min(settings.max_speed);

    state.velocity = dir * speed;

    BoidUpdate {
        transform: Transform::new(
            transform.position + state.velocity * dt,
            look_rotation(dir, transform.up()),
        ),
        state,
    }
}
