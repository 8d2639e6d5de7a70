//! Deferred structural mutation.
//!
//! Systems never spawn, despawn, insert or remove while iterating the world.
//! They record those changes into command lanes instead. A sequential pass
//! records into one lane; a parallel pass gets one lane per worker chunk.
//! At a flush barrier the lanes are replayed in lane order, each lane in
//! submission order, so the resulting world does not depend on how the
//! thread pool scheduled the chunks.

use hecs::{CommandBuffer, World};
use rayon::prelude::*;

/// Ordered set of pending command lanes.
#[derive(Default)]
pub struct MutationQueue {
    lanes: Vec<CommandBuffer>,
}

impl MutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh lane at the end of the queue.
    pub fn lane(&mut self) -> &mut CommandBuffer {
        let index = self.lanes.len();
        self.lanes.push(CommandBuffer::new());
        &mut self.lanes[index]
    }

    /// Append lanes recorded by a parallel pass, keeping their chunk order.
    pub fn extend_lanes(&mut self, lanes: impl IntoIterator<Item = CommandBuffer>) {
        self.lanes.extend(lanes);
    }

    pub fn pending_lanes(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Replay every lane into the world and empty the queue.
    ///
    /// Commands aimed at entities that no longer exist are dropped, which
    /// makes repeated despawn or tag requests harmless.
    pub fn flush(&mut self, world: &mut World) {
        if self.lanes.is_empty() {
            return;
        }
        log::trace!("flushing {} command lanes", self.lanes.len());
        for mut lane in self.lanes.drain(..) {
            lane.run_on(world);
        }
    }
}

/// Run `record` over `items` in chunks on the rayon pool, one lane per chunk.
///
/// The returned lanes are in chunk order regardless of completion order.
pub fn record_par_chunks<T, F>(items: &mut [T], chunk_size: usize, record: F) -> Vec<CommandBuffer>
where
    T: Send,
    F: Fn(&mut [T], &mut CommandBuffer) + Sync + Send,
{
    items
        .par_chunks_mut(chunk_size.max(1))
        .map(|chunk| {
            let mut lane = CommandBuffer::new();
            record(chunk, &mut lane);
            lane
        })
        .collect()
}
