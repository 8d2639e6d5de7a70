//! Asteroid belt spawner.
//!
//! An armed belt fills a flat ring around itself with asteroids, then
//! disarms in the same pass. Placement is a pure function of the belt's
//! seed and parameters, so the same belt always produces the same field.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use hecs::World;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use starbelt_core::components::{AsteroidBelt, AsteroidCollection, BeltObject, Spawner};
use starbelt_core::enums::AsteroidClass;
use starbelt_core::types::Transform;

use crate::mutation::MutationQueue;
use crate::templates;
use crate::world_setup;

/// Where one asteroid goes and which template it uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidPlacement {
    pub position: Vec3,
    pub class: AsteroidClass,
}

/// Shared orientation of freshly spawned asteroids.
pub fn spawn_orientation() -> Quat {
    Quat::from_xyzw(1.0, 2.0, 3.0, 1.0).normalize()
}

/// Fire every armed belt.
pub fn run(world: &mut World, collection: &mut Option<AsteroidCollection>, queue: &mut MutationQueue) {
    let Some(collection) = templates::resolve(world, collection) else {
        return;
    };

    let lane = queue.lane();
    for (_entity, (spawner, belt, transform)) in
        world.query_mut::<(&mut Spawner, &AsteroidBelt, &Transform)>()
    {
        if !spawner.is_spawning {
            continue;
        }
        spawner.is_spawning = false;

        let belt_object = BeltObject {
            orbit_speed: belt.orbit_speed,
            clockwise: belt.clockwise,
            parent_position: transform.position,
            parent_up: transform.up(),
        };

        let placements = belt_placements(belt, transform);
        log::debug!(
            "belt (seed {}) spawning {} asteroids",
            belt.seed,
            placements.len()
        );
        for placement in placements {
            lane.spawn(world_setup::asteroid_bundle(
                collection.template(placement.class),
                placement.position,
                spawn_orientation(),
                belt_object,
            ));
        }
    }
}

/// Draw `number_of_asteroids` placements from the belt's seed.
///
/// Per asteroid, in order: angle in [0, 2π), radius in [inner, outer),
/// height in [-h/2, h/2), then a class draw in 0..3.
pub fn belt_placements(belt: &AsteroidBelt, transform: &Transform) -> Vec<AsteroidPlacement> {
    let mut rng = ChaCha8Rng::seed_from_u64(belt.seed);
    let half_height = belt.height / 2.0;

    (0..belt.number_of_asteroids)
        .map(|_| {
            let angle = draw(&mut rng, 0.0, TAU);
            let radius = draw(&mut rng, belt.inner_radius, belt.outer_radius);
            let height = draw(&mut rng, -half_height, half_height);
            let class = AsteroidClass::from_draw(rng.gen_range(0..3));

            let local = Vec3::new(radius * angle.cos(), height, radius * angle.sin());
            AsteroidPlacement {
                position: transform.position + transform.rotation * local,
                class,
            }
        })
        .collect()
}

/// Uniform in `[low, high)`. An empty range yields `low` but still consumes
/// a draw, keeping later draws aligned.
fn draw(rng: &mut ChaCha8Rng, low: f32, high: f32) -> f32 {
    let t: f32 = rng.gen();
    if high > low {
        low + (high - low) * t
    } else {
        low
    }
}
