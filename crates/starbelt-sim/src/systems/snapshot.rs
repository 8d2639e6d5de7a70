//! Builds the per-tick report handed back to the host.

use hecs::World;

use starbelt_core::components::{Asteroid, Boid, Health, Player, PlayerMove, Projectile};
use starbelt_core::events::GameEvent;
use starbelt_core::state::{PlayerView, PopulationView, TickReport};
use starbelt_core::types::{SimTime, Transform};

/// Assemble the report for the tick that just ran.
pub fn build_report(
    world: &World,
    time: &SimTime,
    events: Vec<GameEvent>,
    close_requested: bool,
) -> TickReport {
    TickReport {
        time: *time,
        events,
        close_requested,
        population: population(world),
        player: player_view(world),
    }
}

/// Live entity counts by class.
pub fn population(world: &World) -> PopulationView {
    PopulationView {
        asteroids: world.query::<&Asteroid>().iter().count() as u32,
        boids: world.query::<&Boid>().iter().count() as u32,
        projectiles: world.query::<&Projectile>().iter().count() as u32,
    }
}

fn player_view(world: &World) -> Option<PlayerView> {
    let mut query = world.query::<(&Player, &Transform, &Health, &PlayerMove)>();
    let view = query
        .iter()
        .next()
        .map(|(_, (_, transform, health, movement))| PlayerView {
            position: transform.position,
            health: health.current,
            max_health: health.max,
            moveable: movement.moveable,
        });
    view
}
