//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the scene authored in `SimConfig` (player ship, belt and boid
//! spawners, obstacles, the template registry) and the component bundles
//! spawners instantiate at runtime.

use glam::{Quat, Vec3};
use hecs::{Entity, World};

use starbelt_core::components::*;
use starbelt_core::config::{
    BeltConfig, BoidSpawnerConfig, ObstacleConfig, PlayerConfig, SimConfig, MIN_ROTATION_LENGTH_SQ,
};
use starbelt_core::enums::CollisionLayer;
use starbelt_core::types::{Transform, Velocity};

/// Spawn everything a run needs before the first game start.
/// Spawners start idle; the game-start event arms them.
pub fn setup_scene(world: &mut World, config: &SimConfig) {
    spawn_player(world, &config.player);
    for belt in &config.belts {
        spawn_belt(world, belt);
    }
    for spawner in &config.boid_spawners {
        spawn_boid_spawner(world, spawner);
    }
    for obstacle in &config.obstacles {
        spawn_obstacle(world, obstacle);
    }
    spawn_template_registry(world, config);

    log::debug!(
        "scene ready: {} belts, {} boid spawners, {} obstacles",
        config.belts.len(),
        config.boid_spawners.len(),
        config.obstacles.len()
    );
}

/// Spawn the player ship. It stays frozen until the first game start.
pub fn spawn_player(world: &mut World, config: &PlayerConfig) -> Entity {
    world.spawn((
        Player,
        Transform::from_position(config.position),
        Velocity::default(),
        Health {
            current: config.max_health,
            max: config.max_health,
        },
        PlayerMove {
            forward_factor: 0.0,
            rotation: Vec3::ZERO,
            moveable: false,
            forward_speed: config.forward_speed,
            turn_speed: config.turn_speed,
        },
        PlayerShoot::default(),
        CannonMounts {
            first: config.first_cannon,
            second: config.second_cannon,
        },
        Collider {
            radius: config.collider_radius,
            layer: CollisionLayer::PLAYER,
            collides_with: CollisionLayer::ASTEROID | CollisionLayer::BOID | CollisionLayer::OBSTACLE,
        },
    ))
}

pub fn spawn_belt(world: &mut World, config: &BeltConfig) -> Entity {
    world.spawn((
        Transform::new(config.position, belt_rotation(config.rotation)),
        Spawner::default(),
        AsteroidBelt {
            number_of_asteroids: 0,
            seed: config.seed,
            inner_radius: config.inner_radius,
            outer_radius: config.outer_radius,
            height: config.height,
            orbit_speed: config.orbit_speed,
            clockwise: config.clockwise,
        },
    ))
}

/// Normalised belt orientation; identity when `rotation` has no direction.
pub fn belt_rotation(rotation: Quat) -> Quat {
    if rotation.is_finite() && rotation.length_squared() >= MIN_ROTATION_LENGTH_SQ {
        rotation.normalize()
    } else {
        log::warn!("belt rotation {rotation:?} cannot be normalised, using identity");
        Quat::IDENTITY
    }
}

pub fn spawn_boid_spawner(world: &mut World, config: &BoidSpawnerConfig) -> Entity {
    world.spawn((
        Transform::from_position(config.position),
        Spawner::default(),
        BoidSpawner {
            spawn_count: 0,
            spawn_radius: config.spawn_radius,
            seed: config.seed,
        },
        config.settings,
    ))
}

pub fn spawn_obstacle(world: &mut World, config: &ObstacleConfig) -> Entity {
    world.spawn((
        Obstacle,
        Transform::from_position(config.position),
        Collider {
            radius: config.radius,
            layer: CollisionLayer::OBSTACLE,
            collides_with: CollisionLayer::PLAYER | CollisionLayer::BOID,
        },
    ))
}

/// The registry entity holding every prefab template.
pub fn spawn_template_registry(world: &mut World, config: &SimConfig) -> Entity {
    world.spawn((
        config.prefabs.asteroids,
        config.prefabs.boid,
        config.prefabs.projectile,
    ))
}

/// Components of one belt asteroid.
pub fn asteroid_bundle(
    template: &AsteroidTemplate,
    position: Vec3,
    rotation: Quat,
    belt_object: BeltObject,
) -> (Asteroid, Transform, Health, BeltObject, Collider) {
    (
        Asteroid {
            damage: template.damage,
        },
        Transform::new(position, rotation),
        Health {
            current: template.health,
            max: template.health,
        },
        belt_object,
        Collider {
            radius: template.radius,
            layer: CollisionLayer::ASTEROID,
            collides_with: CollisionLayer::PLAYER | CollisionLayer::PROJECTILE | CollisionLayer::BOID,
        },
    )
}

/// Components of one enemy boid.
pub fn boid_bundle(
    template: &BoidTemplate,
    transform: Transform,
    velocity: Vec3,
    settings: BoidSettings,
) -> (Boid, Transform, BoidState, BoidSettings, Collider) {
    (
        Boid {
            damage: template.damage,
        },
        transform,
        BoidState {
            velocity,
            ..Default::default()
        },
        settings,
        Collider {
            radius: template.radius,
            layer: CollisionLayer::BOID,
            collides_with: CollisionLayer::PLAYER | CollisionLayer::PROJECTILE,
        },
    )
}

/// Components of one player projectile.
pub fn projectile_bundle(
    template: &ProjectileTemplate,
    transform: Transform,
    velocity: Vec3,
) -> (Projectile, Transform, Velocity, TimeToLive, Collider) {
    (
        Projectile,
        transform,
        Velocity::new(velocity),
        TimeToLive::new(template.max_duration),
        Collider {
            radius: template.radius,
            layer: CollisionLayer::PROJECTILE,
            collides_with: CollisionLayer::ASTEROID | CollisionLayer::BOID,
        },
    )
}
