//! Per-tick report returned by the engine to its host.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::types::SimTime;

/// Everything the host needs after one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickReport {
    pub time: SimTime,
    /// Outbound events in emission order.
    pub events: Vec<GameEvent>,
    /// Set once the close-game input was seen. The host should shut down.
    pub close_requested: bool,
    pub population: PopulationView,
    pub player: Option<PlayerView>,
}

/// Live entity counts by class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationView {
    pub asteroids: u32,
    pub boids: u32,
    pub projectiles: u32,
}

/// Player ship status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Vec3,
    pub health: i32,
    pub max_health: i32,
    pub moveable: bool,
}
