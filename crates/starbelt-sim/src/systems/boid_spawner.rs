//! Boid spawner.
//!
//! An armed spawner releases its swarm and disarms in the same pass. Each
//! burst reseeds from the spawner's seed, so repeated bursts are identical.
//!
//! Offsets are drawn per axis from [0, 1), a cube corner sample rather than
//! a sphere, which keeps every swarm on the spawner's positive side.

use glam::Vec3;
use hecs::World;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use starbelt_core::components::{BoidSettings, BoidSpawner, BoidTemplate, Spawner};
use starbelt_core::types::{look_rotation, Transform};

use crate::mutation::MutationQueue;
use crate::templates;
use crate::world_setup;

/// Initial placement and velocity of one boid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidPlacement {
    pub transform: Transform,
    pub velocity: Vec3,
}

/// Fire every armed boid spawner.
pub fn run(world: &mut World, template: &mut Option<BoidTemplate>, queue: &mut MutationQueue) {
    let Some(template) = templates::resolve(world, template) else {
        return;
    };

    let lane = queue.lane();
    for (_entity, (spawner, boid_spawner, transform, settings)) in
        world.query_mut::<(&mut Spawner, &BoidSpawner, &Transform, &BoidSettings)>()
    {
        if !spawner.is_spawning {
            continue;
        }
        spawner.is_spawning = false;

        let placements = swarm_placements(boid_spawner, transform.position, settings);
        log::debug!("boid spawner releasing {} boids", placements.len());
        for placement in placements {
            lane.spawn(world_setup::boid_bundle(
                &template,
                placement.transform,
                placement.velocity,
                *settings,
            ));
        }
    }
}

/// Draw `spawn_count` placements around `origin`.
///
/// Boids face along their offset and start at the middle of their speed
/// range in that direction.
pub fn swarm_placements(
    spawner: &BoidSpawner,
    origin: Vec3,
    settings: &BoidSettings,
) -> Vec<BoidPlacement> {
    let mut rng = ChaCha8Rng::seed_from_u64(spawner.seed);
    let cruise_speed = (settings.min_speed + settings.max_speed) / 2.0;

    (0..spawner.spawn_count)
        .map(|_| {
            let x: f32 = rng.gen();
            let y: f32 = rng.gen();
            let z: f32 = rng.gen();
            let sample = Vec3::new(x, y, z);

            BoidPlacement {
                transform: Transform::new(
                    origin + sample * spawner.spawn_radius,
                    look_rotation(sample, Vec3::Y),
                ),
                velocity: sample.normalize_or_zero() * cruise_speed,
            }
        })
        .collect()
}
