//! Game start and game end handling.

use hecs::World;

use starbelt_core::components::{
    Asteroid, AsteroidBelt, Boid, BoidSpawner, DespawnPending, PlayerMove, PlayerShoot, Spawner,
};

use crate::mutation::MutationQueue;

/// Arm spawners with the requested counts and toggle player controls.
/// A missing count leaves that kind of spawner untouched.
pub fn start_game(world: &mut World, asteroids: Option<u32>, enemies: Option<u32>) {
    if let Some(count) = asteroids {
        for (_entity, (spawner, belt)) in world.query_mut::<(&mut Spawner, &mut AsteroidBelt)>() {
            spawner.is_spawning = true;
            belt.number_of_asteroids = count;
        }
    }
    if let Some(count) = enemies {
        for (_entity, (spawner, boid_spawner)) in world.query_mut::<(&mut Spawner, &mut BoidSpawner)>()
        {
            spawner.is_spawning = true;
            boid_spawner.spawn_count = count;
        }
    }

    set_controls(world, None);
    log::info!("game started (asteroids: {asteroids:?}, enemies: {enemies:?})");
}

/// Tag every asteroid and boid for despawn and update player controls.
///
/// With `state` present, controls become `!state`; without it they toggle.
pub fn end_game(world: &mut World, state: Option<bool>, queue: &mut MutationQueue) {
    let lane = queue.lane();
    for (entity, _asteroid) in world.query_mut::<&Asteroid>() {
        lane.insert_one(entity, DespawnPending);
    }
    for (entity, _boid) in world.query_mut::<&Boid>() {
        lane.insert_one(entity, DespawnPending);
    }

    set_controls(world, state);
    log::info!("game ended (state: {state:?})");
}

fn set_controls(world: &mut World, state: Option<bool>) {
    for (_entity, (movement, shoot)) in world.query_mut::<(&mut PlayerMove, &mut PlayerShoot)>() {
        match state {
            Some(state) => {
                movement.moveable = !state;
                shoot.can_shoot = !state;
            }
            None => {
                movement.moveable = !movement.moveable;
                shoot.can_shoot = !shoot.can_shoot;
            }
        }
    }
}
