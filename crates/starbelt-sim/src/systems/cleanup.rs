//! Cleanup system: the one place entities are destroyed.
//!
//! Collision, health, lifetime and game-end handling only tag entities with
//! `DespawnPending`; this pass removes them after the final flush.

use hecs::{Entity, World};

use starbelt_core::components::DespawnPending;

/// Despawn every entity tagged `DespawnPending`. Returns how many went.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) -> usize {
    despawn_buffer.clear();

    for (entity, _pending) in world.query_mut::<&DespawnPending>() {
        despawn_buffer.push(entity);
    }

    let count = despawn_buffer.len();
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }

    if count > 0 {
        log::trace!("cleanup despawned {count} entities");
    }
    count
}
