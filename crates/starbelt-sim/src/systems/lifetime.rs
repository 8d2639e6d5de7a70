//! Time-to-live reaper for short-lived entities such as projectiles.

use hecs::World;

use starbelt_core::components::{DespawnPending, TimeToLive};
use starbelt_core::constants::PAR_CHUNK_SIZE;

use crate::mutation::{record_par_chunks, MutationQueue};

/// Age every timer by `dt` and tag the ones past their maximum.
///
/// The comparison is strict: a timer sitting exactly at `max` survives.
/// Runs in parallel chunks, one command lane per chunk.
pub fn run(world: &mut World, dt: f32, queue: &mut MutationQueue) {
    let mut timers: Vec<_> = world.query_mut::<&mut TimeToLive>().into_iter().collect();
    if timers.is_empty() {
        return;
    }

    let lanes = record_par_chunks(&mut timers, PAR_CHUNK_SIZE, |chunk, lane| {
        for (entity, ttl) in chunk.iter_mut() {
            ttl.current += dt;
            if ttl.current > ttl.max {
                lane.insert_one(*entity, DespawnPending);
            }
        }
    });
    queue.extend_lanes(lanes);
}
