//! Game events exchanged between the simulation and its surroundings.
//!
//! Events are strongly typed; a field that is `None` means the publisher did
//! not provide it, and handlers treat that as "no change".

use serde::{Deserialize, Serialize};

/// A notification crossing the simulation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A new run begins with the given spawn counts.
    GameStart {
        asteroids: Option<u32>,
        enemies: Option<u32>,
    },
    /// The current run ends. `state: Some(true)` means the player lost.
    GameEnd { state: Option<bool> },
    /// Player health as a fraction of max health.
    HealthDisplay { percentage: f32 },
    /// Points earned by destroying an entity.
    ScoreIncrease { amount: i32 },
}

/// Subscription topic of a `GameEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    GameStart,
    GameEnd,
    HealthDisplay,
    ScoreIncrease,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::GameStart { .. } => EventKind::GameStart,
            GameEvent::GameEnd { .. } => EventKind::GameEnd,
            GameEvent::HealthDisplay { .. } => EventKind::HealthDisplay,
            GameEvent::ScoreIncrease { .. } => EventKind::ScoreIncrease,
        }
    }
}

type Handler = Box<dyn FnMut(&GameEvent) + Send>;

/// Topic-based publish/subscribe dispatcher.
///
/// Owned by whoever drives the simulation and passed explicitly; there is no
/// process-wide instance. Handlers run synchronously in subscription order.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<(EventKind, Handler)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every event of `kind`.
    pub fn subscribe(&mut self, kind: EventKind, handler: impl FnMut(&GameEvent) + Send + 'static) {
        self.handlers.push((kind, Box::new(handler)));
    }

    /// Deliver `event` to every handler subscribed to its kind.
    /// Returns the number of handlers invoked.
    pub fn broadcast(&mut self, event: &GameEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        for (topic, handler) in &mut self.handlers {
            if *topic == kind {
                handler(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Broadcast every event in order.
    pub fn broadcast_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            self.broadcast(event);
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.handlers.iter().filter(|(topic, _)| *topic == kind).count()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
