//! Flocking system.
//!
//! Snapshots every boid, computes all updates in parallel against that
//! snapshot, then writes them back. No boid sees another boid's update from
//! the same tick. Idle until exactly one player exists to chase.

use glam::Vec3;
use hecs::{Entity, World};
use rayon::prelude::*;

use starbelt_core::components::{BoidSettings, BoidState, DespawnPending, Player};
use starbelt_core::enums::CollisionFilter;
use starbelt_core::types::Transform;
use starbelt_flock::avoidance::avoidance_directions;
use starbelt_flock::flock::{update_boid, BoidContext, BoidUpdate, Neighbour};

use crate::physics::CastQuery;

struct BoidSnapshot {
    entity: Entity,
    transform: Transform,
    state: BoidState,
    settings: BoidSettings,
}

/// Run one flocking step for all live boids.
pub fn run<C: CastQuery + ?Sized>(world: &mut World, casts: &C, dt: f32) {
    let Some(target) = single_player_position(world) else {
        return;
    };

    let boids: Vec<BoidSnapshot> = {
        let mut query =
            world.query::<(&Transform, &BoidState, &BoidSettings, Option<&DespawnPending>)>();
        query
            .iter()
            .filter(|(_, (_, _, _, pending))| pending.is_none())
            .map(|(entity, (transform, state, settings, _))| BoidSnapshot {
                entity,
                transform: *transform,
                state: *state,
                settings: *settings,
            })
            .collect()
    };
    if boids.is_empty() {
        return;
    }

    let flock: Vec<Neighbour> = boids
        .iter()
        .map(|boid| Neighbour {
            position: boid.transform.position,
            forward: boid.transform.forward(),
        })
        .collect();
    let directions = avoidance_directions();

    let updates: Vec<BoidUpdate> = boids
        .par_iter()
        .map(|boid| {
            let ctx = BoidContext {
                transform: boid.transform,
                state: boid.state,
                settings: &boid.settings,
                target,
                dt,
            };
            let origin = boid.transform.position;
            update_boid(&ctx, &flock, directions, |direction| {
                casts.sphere_cast(
                    origin,
                    boid.settings.sphere_cast_radius,
                    direction,
                    boid.settings.collision_avoidance_distance,
                    CollisionFilter::BOID_AVOIDANCE,
                )
            })
        })
        .collect();

    for (boid, update) in boids.iter().zip(updates) {
        if let Ok((transform, state)) =
            world.query_one_mut::<(&mut Transform, &mut BoidState)>(boid.entity)
        {
            *transform = update.transform;
            *state = update.state;
        }
    }
}

/// Position of the player, if there is exactly one.
fn single_player_position(world: &World) -> Option<Vec3> {
    let mut query = world.query::<(&Player, &Transform)>();
    let mut players = query.iter();
    let first = players.next().map(|(_, (_, transform))| transform.position);
    if players.next().is_some() {
        return None;
    }
    first
}
