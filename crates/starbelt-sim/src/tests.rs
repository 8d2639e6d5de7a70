//! Tests for the simulation engine, spawners, flocking and the damage pipeline.

use approx::assert_abs_diff_eq;
use glam::{Quat, Vec3};
use hecs::{CommandBuffer, Entity, World};

use starbelt_core::commands::InputSample;
use starbelt_core::components::*;
use starbelt_core::config::{ObstacleConfig, PlayerConfig, SimConfig};
use starbelt_core::constants::DT;
use starbelt_core::enums::CollisionFilter;
use starbelt_core::events::GameEvent;
use starbelt_core::types::{SimTime, Transform};

use crate::engine::SimulationEngine;
use crate::mailbox::Mailbox;
use crate::mutation::{record_par_chunks, MutationQueue};
use crate::physics::{CastQuery, CollisionEvent, Physics, SphereWorld};
use crate::systems::collision::{self, Contact, RateLimiter};
use crate::systems::{
    asteroid_spawner, boid_spawner, cleanup, flocking, health, lifetime, orbit, player_motion,
    snapshot,
};
use crate::world_setup;

// ---- Helpers ----

fn player_move(moveable: bool) -> PlayerMove {
    PlayerMove {
        forward_factor: 0.0,
        rotation: Vec3::ZERO,
        moveable,
        forward_speed: 10.0,
        turn_speed: 1.0,
    }
}

/// Belt membership that keeps an asteroid in place.
fn parked(position: Vec3) -> BeltObject {
    BeltObject {
        orbit_speed: 0.0,
        clockwise: true,
        parent_position: position,
        parent_up: Vec3::Y,
    }
}

fn spawn_asteroid(world: &mut World, template: &AsteroidTemplate, position: Vec3) -> Entity {
    world.spawn(world_setup::asteroid_bundle(
        template,
        position,
        Quat::IDENTITY,
        parked(position),
    ))
}

fn spawn_test_boid(world: &mut World, position: Vec3, velocity: Vec3) -> Entity {
    world.spawn(world_setup::boid_bundle(
        &BoidTemplate {
            damage: 10,
            radius: 0.5,
        },
        Transform::from_position(position),
        velocity,
        BoidSettings::default(),
    ))
}

fn contact(a: Entity, b: Entity) -> CollisionEvent {
    CollisionEvent { a, b }
}

fn is_pending(world: &World, entity: Entity) -> bool {
    world.get::<&DespawnPending>(entity).is_ok()
}

fn damage_of(world: &World, entity: Entity) -> Option<i32> {
    world.get::<&Damage>(entity).ok().map(|d| d.amount)
}

fn player_state(engine: &SimulationEngine) -> (Health, PlayerMove) {
    let mut query = engine.world().query::<(&Player, &Health, &PlayerMove)>();
    let (_, (_, health, movement)) = query.iter().next().unwrap();
    (*health, *movement)
}

fn boid_positions(world: &World) -> Vec<Vec3> {
    let mut query = world.query::<(&Boid, &Transform)>();
    query.iter().map(|(_, (_, t))| t.position).collect()
}

/// Engine after a game start, with templates resolved.
fn started_engine(asteroids: Option<u32>, enemies: Option<u32>) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_event(GameEvent::GameStart { asteroids, enemies });
    engine.tick();
    engine
}

// ---- Determinism ----

#[test]
fn test_determinism_same_config() {
    let mut engine_a = started_engine(Some(60), Some(12));
    let mut engine_b = started_engine(Some(60), Some(12));

    for tick in 0..300 {
        let input = InputSample {
            forward: true,
            turn_left: tick % 90 < 20,
            shoot: tick % 30 == 0,
            ..Default::default()
        };
        engine_a.set_input(input);
        engine_b.set_input(input);

        let report_a = engine_a.tick();
        let report_b = engine_b.tick();

        let json_a = serde_json::to_string(&report_a).unwrap();
        let json_b = serde_json::to_string(&report_b).unwrap();
        assert_eq!(json_a, json_b, "Reports diverged on tick {tick}");
    }

    assert_eq!(
        boid_positions(engine_a.world()),
        boid_positions(engine_b.world()),
        "Boid positions diverged"
    );
}

// ---- Game flow ----

#[test]
fn test_templates_resolve_before_first_spawn() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_event(GameEvent::GameStart {
        asteroids: Some(10),
        enemies: Some(4),
    });

    let first = engine.tick();
    assert_eq!(first.population.asteroids, 0, "first tick only resolves templates");
    assert_eq!(first.population.boids, 0);

    let second = engine.tick();
    assert_eq!(second.population.asteroids, 10);
    assert_eq!(second.population.boids, 4);

    // Spawners disarm after one burst.
    let third = engine.tick();
    assert_eq!(third.population.asteroids, 10);
    assert_eq!(third.population.boids, 4);
}

#[test]
fn test_game_start_without_counts_only_toggles_controls() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    assert!(!player_state(&engine).1.moveable, "player starts frozen");

    engine.queue_event(GameEvent::GameStart {
        asteroids: None,
        enemies: None,
    });
    engine.tick();
    let report = engine.tick();

    assert!(player_state(&engine).1.moveable);
    assert_eq!(report.population.asteroids, 0);
    assert_eq!(report.population.boids, 0);
}

#[test]
fn test_game_end_state_sets_controls() {
    let mut engine = SimulationEngine::new(SimConfig::default());

    engine.queue_event(GameEvent::GameEnd { state: Some(false) });
    engine.tick();
    assert!(player_state(&engine).1.moveable);

    engine.queue_event(GameEvent::GameEnd { state: Some(false) });
    engine.tick();
    assert!(player_state(&engine).1.moveable, "explicit state does not toggle");

    engine.queue_event(GameEvent::GameEnd { state: Some(true) });
    engine.tick();
    assert!(!player_state(&engine).1.moveable);
}

#[test]
fn test_end_game_input() {
    let mut engine = started_engine(Some(10), Some(3));
    let report = engine.tick();
    assert_eq!(report.population.asteroids, 10);
    assert_eq!(report.population.boids, 3);

    engine.set_input(InputSample {
        end_game: true,
        ..Default::default()
    });
    let report = engine.tick();

    assert_eq!(
        report.events[..2],
        [
            GameEvent::HealthDisplay { percentage: 1.0 },
            GameEvent::GameEnd { state: None },
        ]
    );
    assert_eq!(report.population.asteroids, 0, "game end clears asteroids");
    assert_eq!(report.population.boids, 0, "game end clears boids");
    assert!(!player_state(&engine).1.moveable);

    // A frozen ship ignores the key.
    engine.set_input(InputSample {
        end_game: true,
        ..Default::default()
    });
    let report = engine.tick();
    assert!(report.events.is_empty());
    assert!(!player_state(&engine).1.moveable);
}

#[test]
fn test_close_game_input() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    assert!(!engine.tick().close_requested);

    engine.set_input(InputSample {
        close_game: true,
        ..Default::default()
    });
    let report = engine.tick();
    assert!(report.close_requested);
    assert!(engine.close_requested());

    // Sticky once seen.
    assert!(engine.tick().close_requested);
}

#[test]
fn test_time_scale_clamped() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.set_time_scale(10.0);
    assert_eq!(engine.time_scale(), 4.0);
    engine.set_time_scale(-1.0);
    assert_eq!(engine.time_scale(), 0.0);
}

#[test]
fn test_tick_advances_time() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    for _ in 0..60 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 60);
    assert_abs_diff_eq!(engine.time().elapsed_secs, 1.0, epsilon = 1e-5);
}

// ---- Shooting and lifetime ----

#[test]
fn test_shoot_spawns_projectile_pair_that_expires() {
    let mut engine = started_engine(None, None);

    engine.set_input(InputSample {
        shoot: true,
        ..Default::default()
    });
    let report = engine.tick();
    assert_eq!(report.population.projectiles, 2);

    let mut xs: Vec<f32> = {
        let mut query = engine.world().query::<(&Projectile, &Transform)>();
        query.iter().map(|(_, (_, t))| t.position.x).collect()
    };
    xs.sort_by(f32::total_cmp);
    assert_abs_diff_eq!(xs[0], -1.5, epsilon = 1e-4);
    assert_abs_diff_eq!(xs[1], 1.5, epsilon = 1e-4);

    // Shoot is key-down: the next tick fires nothing.
    assert_eq!(engine.tick().population.projectiles, 2);

    for _ in 0..100 {
        engine.tick();
    }
    assert_eq!(engine.tick().population.projectiles, 2, "still inside 2 s lifetime");

    for _ in 0..30 {
        engine.tick();
    }
    assert_eq!(engine.tick().population.projectiles, 0, "expired");
}

#[test]
fn test_shot_survives_newer_input_before_tick() {
    let mut engine = started_engine(None, None);

    engine.set_input(InputSample {
        shoot: true,
        ..Default::default()
    });
    engine.set_input(InputSample {
        forward: true,
        ..Default::default()
    });
    let report = engine.tick();
    assert_eq!(report.population.projectiles, 2, "shot fired once");
    assert!(
        report.player.is_some_and(|p| p.position.z > 0.0),
        "held keys follow the latest sample"
    );

    // Consumed by that tick.
    assert_eq!(engine.tick().population.projectiles, 2);
}

#[test]
fn test_cannot_shoot_while_frozen() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.tick();
    engine.set_input(InputSample {
        shoot: true,
        ..Default::default()
    });
    assert_eq!(engine.tick().population.projectiles, 0);
}

#[test]
fn test_ttl_boundary_is_strict() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let mut buffer = Vec::new();
    let shot = world.spawn((TimeToLive::new(2.0),));

    for dt in [0.5, 1.0, 0.5] {
        lifetime::run(&mut world, dt, &mut queue);
        queue.flush(&mut world);
        assert!(!is_pending(&world, shot), "alive at or below max");
    }
    assert_eq!(world.get::<&TimeToLive>(shot).unwrap().current, 2.0);

    lifetime::run(&mut world, 0.1, &mut queue);
    queue.flush(&mut world);
    assert!(is_pending(&world, shot));

    assert_eq!(cleanup::run(&mut world, &mut buffer), 1);
    assert!(!world.contains(shot));
}

#[test]
fn test_lifetime_many_timers_across_chunks() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let short: Vec<Entity> = (0..600).map(|_| world.spawn((TimeToLive::new(0.5),))).collect();
    let long: Vec<Entity> = (0..600).map(|_| world.spawn((TimeToLive::new(5.0),))).collect();

    lifetime::run(&mut world, 1.0, &mut queue);
    assert!(queue.pending_lanes() > 1, "one lane per chunk");
    queue.flush(&mut world);

    assert!(short.iter().all(|&e| is_pending(&world, e)));
    assert!(long.iter().all(|&e| !is_pending(&world, e)));
}

// ---- Collisions ----

#[test]
fn test_projectile_hits_asteroid() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let mut limiter = RateLimiter::per_second(5.0);

    let shot = world.spawn((Projectile,));
    let rock = world.spawn((Asteroid { damage: 5 }, Health { current: 3, max: 3 }));

    assert_eq!(
        collision::classify(&world, &contact(rock, shot)),
        Contact::ProjectileAsteroid {
            projectile: shot,
            asteroid: rock
        }
    );

    collision::run(&world, &[contact(shot, rock)], &mut limiter, 0.0, &mut queue);
    queue.flush(&mut world);

    assert!(is_pending(&world, shot));
    assert!(!is_pending(&world, rock));
    assert_eq!(damage_of(&world, rock), Some(1));
}

#[test]
fn test_player_hits_boid() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let mut limiter = RateLimiter::per_second(5.0);

    let player = world.spawn((Player, Health { current: 100, max: 100 }));
    let boid = world.spawn((Boid { damage: 10 },));

    collision::run(&world, &[contact(boid, player)], &mut limiter, 0.0, &mut queue);
    queue.flush(&mut world);

    assert!(is_pending(&world, boid));
    assert!(!is_pending(&world, player));
    assert_eq!(damage_of(&world, player), Some(10));
}

#[test]
fn test_damage_accumulates_within_tick() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let mut limiter = RateLimiter::per_second(5.0);

    let rock = world.spawn((
        Asteroid { damage: 5 },
        Health { current: 9, max: 9 },
        Damage { amount: 3 },
    ));
    let first = world.spawn((Projectile,));
    let second = world.spawn((Projectile,));

    let events = [contact(first, rock), contact(rock, second)];
    collision::run(&world, &events, &mut limiter, 0.0, &mut queue);
    queue.flush(&mut world);

    assert_eq!(damage_of(&world, rock), Some(5), "3 pending + 2 hits");
    assert!(is_pending(&world, first) && is_pending(&world, second));
}

#[test]
fn test_asteroid_bumps_are_rate_limited() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let mut limiter = RateLimiter::per_second(5.0);

    let player = world.spawn((Player, Health { current: 100, max: 100 }));
    let rock = world.spawn((Asteroid { damage: 20 },));
    let events = [contact(player, rock)];

    collision::run(&world, &events, &mut limiter, 0.0, &mut queue);
    queue.flush(&mut world);
    assert_eq!(damage_of(&world, player), Some(20));
    world.remove_one::<Damage>(player).unwrap();

    collision::run(&world, &events, &mut limiter, 0.1, &mut queue);
    queue.flush(&mut world);
    assert_eq!(damage_of(&world, player), None, "gate closed");

    collision::run(&world, &events, &mut limiter, 0.2, &mut queue);
    queue.flush(&mut world);
    assert_eq!(damage_of(&world, player), Some(20));
    assert!(!is_pending(&world, rock), "asteroids survive bumps");
}

#[test]
fn test_rate_limiter_catches_up() {
    let mut limiter = RateLimiter::per_second(5.0);
    assert!(limiter.try_fire(0.0));
    assert!(!limiter.try_fire(0.19));
    assert!(limiter.try_fire(0.2));

    // After a stall the gate opens once per tick until caught up.
    assert!(limiter.try_fire(1.0));
    assert!(limiter.try_fire(1.0));
    assert!(limiter.try_fire(1.0));
    assert!(limiter.try_fire(1.0));
    assert!(!limiter.try_fire(1.0));
}

#[test]
fn test_ignored_contacts() {
    let mut world = World::new();
    let shot_a = world.spawn((Projectile,));
    let shot_b = world.spawn((Projectile,));
    let boid = world.spawn((Boid { damage: 10 },));
    let rock = world.spawn((Asteroid { damage: 5 },));
    let tagged = world.spawn((Asteroid { damage: 5 }, DespawnPending));
    let gone = world.spawn((Asteroid { damage: 5 },));
    world.despawn(gone).unwrap();

    for event in [
        contact(shot_a, shot_b),
        contact(shot_a, boid),
        contact(boid, rock),
        contact(shot_a, tagged),
        contact(shot_a, gone),
    ] {
        assert_eq!(collision::classify(&world, &event), Contact::Ignored, "{event:?}");
    }
}

// ---- Health ----

#[test]
fn test_damage_applied_and_removed() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let mut mailbox = Mailbox::new();

    let rock = world.spawn((Health { current: 10, max: 10 }, Damage { amount: 3 }));
    health::apply_damage(&mut world, &mut mailbox, &mut queue);
    queue.flush(&mut world);

    assert_eq!(world.get::<&Health>(rock).unwrap().current, 7);
    assert_eq!(damage_of(&world, rock), None);
    assert!(mailbox.is_empty(), "only players report health");
}

#[test]
fn test_player_damage_posts_health_fraction() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let mut mailbox = Mailbox::new();

    world.spawn((Player, Health { current: 100, max: 100 }, Damage { amount: 25 }));
    health::apply_damage(&mut world, &mut mailbox, &mut queue);

    let mut events = Vec::new();
    mailbox.drain_into(&mut events);
    assert_eq!(events, vec![GameEvent::HealthDisplay { percentage: 0.75 }]);
}

#[test]
fn test_depleted_non_player_scores_once() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let mut mailbox = Mailbox::new();

    let rock = world.spawn((Asteroid { damage: 5 }, Health { current: -2, max: 10 }));
    health::remove_depleted(&mut world, &mut mailbox, &mut queue);
    queue.flush(&mut world);
    assert!(is_pending(&world, rock));

    health::remove_depleted(&mut world, &mut mailbox, &mut queue);
    queue.flush(&mut world);

    let mut events = Vec::new();
    mailbox.drain_into(&mut events);
    assert_eq!(events, vec![GameEvent::ScoreIncrease { amount: 10 }]);
}

#[test]
fn test_depleted_player_resets_and_ends_game() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let mut mailbox = Mailbox::new();

    let player = world.spawn((Player, Health { current: 0, max: 100 }, player_move(true)));
    health::remove_depleted(&mut world, &mut mailbox, &mut queue);
    queue.flush(&mut world);

    assert_eq!(world.get::<&Health>(player).unwrap().current, 100);
    assert!(!is_pending(&world, player), "players are never despawned");

    let mut events = Vec::new();
    mailbox.drain_into(&mut events);
    assert_eq!(events, vec![GameEvent::GameEnd { state: Some(true) }]);
}

#[test]
fn test_frozen_player_does_not_end_game_again() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let mut mailbox = Mailbox::new();

    let player = world.spawn((Player, Health { current: -5, max: 100 }, player_move(false)));
    health::remove_depleted(&mut world, &mut mailbox, &mut queue);

    assert_eq!(world.get::<&Health>(player).unwrap().current, -5);
    assert!(mailbox.is_empty());
}

#[test]
fn test_mailbox_drain_order() {
    let mut mailbox = Mailbox::new();
    mailbox.post_score(3);
    mailbox.post_game_over();
    mailbox.post_health(0.5);
    mailbox.post_game_over();
    mailbox.post_score(1);

    let mut events = Vec::new();
    mailbox.drain_into(&mut events);
    assert_eq!(
        events,
        vec![
            GameEvent::HealthDisplay { percentage: 0.5 },
            GameEvent::ScoreIncrease { amount: 3 },
            GameEvent::ScoreIncrease { amount: 1 },
            GameEvent::GameEnd { state: Some(true) },
        ]
    );
    assert!(mailbox.is_empty());
}

// ---- Pipeline through the engine ----

#[test]
fn test_boid_ramming_player() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    spawn_test_boid(engine.world_mut(), Vec3::new(0.0, 0.0, 0.5), Vec3::Z * 3.5);

    let report = engine.tick();

    assert_eq!(report.population.boids, 0, "boid destroyed on contact");
    assert_eq!(report.events.len(), 1);
    match report.events[0] {
        GameEvent::HealthDisplay { percentage } => {
            assert_abs_diff_eq!(percentage, 0.9, epsilon = 1e-6)
        }
        other => panic!("expected health display, got {other:?}"),
    }
    let player = report.player.unwrap();
    assert_eq!(player.health, player.max_health - 10);
}

#[test]
fn test_projectile_destroys_light_asteroid() {
    let config = SimConfig::default();
    let light = config.prefabs.asteroids.light;
    let projectile = config.prefabs.projectile;
    let mut engine = SimulationEngine::new(config);

    let spot = Vec3::new(0.0, 0.0, 30.0);
    spawn_asteroid(engine.world_mut(), &light, spot);
    engine.world_mut().spawn(world_setup::projectile_bundle(
        &projectile,
        Transform::from_position(spot),
        Vec3::ZERO,
    ));

    let report = engine.tick();
    assert_eq!(
        report.events,
        vec![GameEvent::ScoreIncrease {
            amount: light.health
        }]
    );
    assert_eq!(report.population.asteroids, 0);
    assert_eq!(report.population.projectiles, 0);
}

#[test]
fn test_player_death_ends_game_once() {
    let config = SimConfig::default();
    let heavy = config.prefabs.asteroids.heavy;
    let mut engine = started_engine(None, None);

    for (_e, (_p, health)) in engine.world_mut().query_mut::<(&Player, &mut Health)>() {
        health.current = 5;
    }
    spawn_asteroid(engine.world_mut(), &heavy, Vec3::ZERO);

    let mut game_ends = 0;
    for _ in 0..60 {
        let report = engine.tick();
        game_ends += report
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameEnd { state: Some(true) }))
            .count();
    }

    assert_eq!(game_ends, 1);
    let (health, movement) = player_state(&engine);
    assert_eq!(health.current, health.max, "health refilled on death");
    assert!(!movement.moveable);
    assert_eq!(snapshot::population(engine.world()).asteroids, 0);
}

// ---- Spawners ----

fn test_belt(seed: u64) -> AsteroidBelt {
    AsteroidBelt {
        number_of_asteroids: 50,
        seed,
        inner_radius: 10.0,
        outer_radius: 20.0,
        height: 4.0,
        orbit_speed: 0.5,
        clockwise: true,
    }
}

#[test]
fn test_belt_placements_stay_in_ring() {
    let centre = Vec3::new(5.0, 0.0, 0.0);
    let transform = Transform::from_position(centre);
    let placements = asteroid_spawner::belt_placements(&test_belt(7), &transform);

    assert_eq!(placements.len(), 50);
    for placement in &placements {
        let offset = placement.position - centre;
        let radial = Vec3::new(offset.x, 0.0, offset.z).length();
        assert!((10.0 - 1e-4..=20.0 + 1e-4).contains(&radial), "radius {radial}");
        assert!(offset.y.abs() <= 2.0, "height {}", offset.y);
    }
}

#[test]
fn test_belt_placements_repeat_per_seed() {
    let transform = Transform::default();
    let a = asteroid_spawner::belt_placements(&test_belt(7), &transform);
    let b = asteroid_spawner::belt_placements(&test_belt(7), &transform);
    let c = asteroid_spawner::belt_placements(&test_belt(8), &transform);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_degenerate_belt_keeps_draw_order() {
    let transform = Transform::default();
    let normal = asteroid_spawner::belt_placements(&test_belt(3), &transform);
    let flat = asteroid_spawner::belt_placements(
        &AsteroidBelt {
            inner_radius: 15.0,
            outer_radius: 15.0,
            height: 0.0,
            ..test_belt(3)
        },
        &transform,
    );

    for (n, f) in normal.iter().zip(&flat) {
        assert_abs_diff_eq!(f.position.y, 0.0);
        assert_abs_diff_eq!(Vec3::new(f.position.x, 0.0, f.position.z).length(), 15.0, epsilon = 1e-3);
        assert_abs_diff_eq!(
            n.position.z.atan2(n.position.x),
            f.position.z.atan2(f.position.x),
            epsilon = 1e-4
        );
        assert_eq!(n.class, f.class);
    }
}

#[test]
fn test_spawned_asteroids_orbit_their_belt() {
    let mut engine = started_engine(Some(5), None);
    engine.tick();

    let mut query = engine.world().query::<(&Asteroid, &Transform, &BeltObject)>();
    let members: Vec<_> = query.iter().map(|(_, (_, t, b))| (*t, *b)).collect();
    assert_eq!(members.len(), 5);
    for (transform, belt_object) in members {
        assert_eq!(transform.rotation, asteroid_spawner::spawn_orientation());
        assert_eq!(belt_object.parent_position, Vec3::ZERO);
        assert_abs_diff_eq!(belt_object.parent_up.y, 1.0, epsilon = 1e-6);
    }
}

#[test]
fn test_zero_belt_rotation_falls_back_to_identity() {
    let mut config = SimConfig::default();
    config.belts[0].rotation = Quat::from_xyzw(0.0, 0.0, 0.0, 0.0);
    let mut engine = SimulationEngine::new(config);
    engine.queue_event(GameEvent::GameStart {
        asteroids: Some(3),
        enemies: None,
    });
    engine.tick();
    engine.tick();

    let mut query = engine.world().query::<(&Asteroid, &Transform, &BeltObject)>();
    let members: Vec<_> = query.iter().map(|(_, (_, t, b))| (*t, *b)).collect();
    assert_eq!(members.len(), 3);
    for (transform, belt_object) in members {
        assert!(transform.position.is_finite(), "{:?}", transform.position);
        assert!(transform.rotation.is_finite());
        assert_abs_diff_eq!(belt_object.parent_up.y, 1.0, epsilon = 1e-6);
    }

    assert_eq!(
        world_setup::belt_rotation(Quat::from_xyzw(0.0, 0.0, 0.0, 2.0)),
        Quat::IDENTITY
    );
}

#[test]
fn test_swarm_placements() {
    let spawner = BoidSpawner {
        spawn_count: 20,
        spawn_radius: 10.0,
        seed: 3,
    };
    let origin = Vec3::new(0.0, 20.0, 120.0);
    let settings = BoidSettings::default();
    let placements = boid_spawner::swarm_placements(&spawner, origin, &settings);

    assert_eq!(placements.len(), 20);
    for placement in &placements {
        let offset = placement.transform.position - origin;
        for axis in offset.to_array() {
            assert!((-1e-3..=10.0 + 1e-3).contains(&axis), "cube sample {offset:?}");
        }
        assert_abs_diff_eq!(placement.velocity.length(), 3.5, epsilon = 1e-4);
        let heading = placement.transform.forward();
        assert_abs_diff_eq!(heading.dot(placement.velocity.normalize()), 1.0, epsilon = 1e-4);
    }

    assert_eq!(placements, boid_spawner::swarm_placements(&spawner, origin, &settings));
}

// ---- Motion ----

#[test]
fn test_orbit_step() {
    let mut belt_object = BeltObject {
        orbit_speed: 2.0,
        clockwise: true,
        parent_position: Vec3::new(1.0, 0.0, 0.0),
        parent_up: Vec3::Y,
    };
    let start = Vec3::new(1.0, 0.0, 5.0);

    let cw = orbit::orbit_step(start, &belt_object, 0.5);
    assert_abs_diff_eq!(cw.distance(belt_object.parent_position), 5.0, epsilon = 1e-4);
    assert_abs_diff_eq!(cw.x - 1.0, 5.0 * 0.15f32.sin(), epsilon = 1e-4);

    belt_object.clockwise = false;
    let ccw = orbit::orbit_step(start, &belt_object, 0.5);
    assert_abs_diff_eq!(ccw.x - 1.0, -5.0 * 0.15f32.sin(), epsilon = 1e-4);

    belt_object.parent_up = Vec3::ZERO;
    assert_eq!(orbit::orbit_step(start, &belt_object, 0.5), start);
}

#[test]
fn test_player_motion_turns_then_moves() {
    let mut world = World::new();
    let ship = world.spawn((
        Transform::default(),
        PlayerMove {
            forward_factor: 1.0,
            rotation: Vec3::new(0.0, 0.0, 1.0),
            ..player_move(true)
        },
    ));

    player_motion::run(&mut world, 0.5);

    let transform = *world.get::<&Transform>(ship).unwrap();
    let expected_forward = Vec3::new(0.5f32.sin(), 0.0, 0.5f32.cos());
    assert_abs_diff_eq!(transform.forward().dot(expected_forward), 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(transform.position.distance(expected_forward * 5.0), 0.0, epsilon = 1e-4);
}

#[test]
fn test_frozen_player_does_not_move() {
    let mut world = World::new();
    let ship = world.spawn((
        Transform::default(),
        PlayerMove {
            forward_factor: 1.0,
            rotation: Vec3::ONE,
            ..player_move(false)
        },
    ));

    player_motion::run(&mut world, 0.5);
    assert_eq!(*world.get::<&Transform>(ship).unwrap(), Transform::default());
}

// ---- Flocking ----

#[test]
fn test_flocking_needs_exactly_one_player() {
    let physics = SphereWorld::new();
    let mut world = World::new();
    let boid = spawn_test_boid(&mut world, Vec3::new(0.0, 0.0, 50.0), Vec3::Z * 3.5);
    let before = *world.get::<&Transform>(boid).unwrap();

    flocking::run(&mut world, &physics, DT);
    assert_eq!(*world.get::<&Transform>(boid).unwrap(), before, "no player");

    world.spawn((Player, Transform::default()));
    world.spawn((Player, Transform::default()));
    flocking::run(&mut world, &physics, DT);
    assert_eq!(*world.get::<&Transform>(boid).unwrap(), before, "two players");
}

#[test]
fn test_flocking_seeks_player() {
    let physics = SphereWorld::new();
    let mut world = World::new();
    world.spawn((Player, Transform::default()));
    let boid = spawn_test_boid(&mut world, Vec3::new(0.0, 0.0, 50.0), Vec3::Z * 3.5);

    flocking::run(&mut world, &physics, DT);

    let state = *world.get::<&BoidState>(boid).unwrap();
    assert_abs_diff_eq!(state.acceleration.z, -3.0, epsilon = 1e-4);
    assert!(!state.heading_for_collision);
    assert!(state.velocity.z < 3.5);
}

#[test]
fn test_flocking_steers_around_obstacle() {
    let mut physics = SphereWorld::new();
    let mut world = World::new();
    world.spawn((Player, Transform::from_position(Vec3::new(0.0, 0.0, 100.0))));
    world_setup::spawn_obstacle(
        &mut world,
        &ObstacleConfig {
            position: Vec3::new(0.0, 0.0, 3.0),
            radius: 1.0,
        },
    );
    let boid = spawn_test_boid(&mut world, Vec3::ZERO, Vec3::Z * 3.5);

    physics.sync(&world);
    flocking::run(&mut world, &physics, DT);

    let state = *world.get::<&BoidState>(boid).unwrap();
    assert!(state.heading_for_collision);
    assert!(state.acceleration.length() > 0.0);
}

#[test]
fn test_flocking_skips_pending_boids() {
    let physics = SphereWorld::new();
    let mut world = World::new();
    world.spawn((Player, Transform::default()));
    let boid = spawn_test_boid(&mut world, Vec3::new(0.0, 0.0, 50.0), Vec3::Z * 3.5);
    world.insert_one(boid, DespawnPending).unwrap();
    let before = *world.get::<&BoidState>(boid).unwrap();

    flocking::run(&mut world, &physics, DT);
    assert_eq!(*world.get::<&BoidState>(boid).unwrap(), before);
}

// ---- Physics backend ----

#[test]
fn test_sphere_world_casts_and_contacts() {
    let config = SimConfig::default();
    let light = config.prefabs.asteroids.light;
    let mut world = World::new();
    let mut physics = SphereWorld::new();

    let player = world_setup::spawn_player(
        &mut world,
        &PlayerConfig {
            position: Vec3::new(0.0, 0.0, 8.0),
            ..Default::default()
        },
    );
    let near = spawn_asteroid(&mut world, &light, Vec3::new(0.0, 0.0, 10.0));
    let far = spawn_asteroid(&mut world, &light, Vec3::new(0.0, 0.0, 11.0));

    physics.sync(&world);
    assert_eq!(physics.len(), 3);
    assert!(physics.sphere_cast(Vec3::ZERO, 0.27, Vec3::Z, 10.0, CollisionFilter::BOID_AVOIDANCE));
    assert!(
        !physics.sphere_cast(Vec3::ZERO, 0.27, Vec3::NEG_Z, 10.0, CollisionFilter::BOID_AVOIDANCE)
    );

    // Asteroids overlap each other but never pair up.
    let contacts = physics.step(&mut world, DT);
    assert_eq!(contacts.len(), 1);
    let pair = [contacts[0].a, contacts[0].b];
    assert!(pair.contains(&player) && pair.contains(&near));

    world.insert_one(near, DespawnPending).unwrap();
    assert!(physics.step(&mut world, DT).is_empty());
    assert!(world.contains(far));
}

// ---- Mutation queue ----

#[test]
fn test_lanes_replay_in_order() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let target = world.spawn((Health { current: 1, max: 1 },));

    queue.lane().insert_one(target, Damage { amount: 1 });
    queue.lane().insert_one(target, Damage { amount: 2 });
    assert_eq!(queue.pending_lanes(), 2);

    queue.flush(&mut world);
    assert!(queue.is_empty());
    assert_eq!(damage_of(&world, target), Some(2), "later lane wins");
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Order(usize);

#[test]
fn test_parallel_lanes_keep_chunk_order() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let mut items: Vec<usize> = (0..1000).collect();

    let lanes = record_par_chunks(&mut items, 64, |chunk: &mut [usize], lane: &mut CommandBuffer| {
        for i in chunk.iter() {
            lane.spawn((Order(*i),));
        }
    });
    assert_eq!(lanes.len(), 16);
    queue.extend_lanes(lanes);
    queue.flush(&mut world);

    let mut query = world.query::<&Order>();
    let order: Vec<usize> = query.iter().map(|(_, o)| o.0).collect();
    assert_eq!(order, (0..1000).collect::<Vec<_>>());
}

#[test]
fn test_flush_ignores_despawned_targets() {
    let mut world = World::new();
    let mut queue = MutationQueue::new();
    let gone = world.spawn((Health { current: 1, max: 1 },));

    queue.lane().insert_one(gone, DespawnPending);
    world.despawn(gone).unwrap();
    queue.flush(&mut world);
    assert!(!world.contains(gone));
}

// ---- Report ----

#[test]
fn test_report_reflects_world() {
    let mut world = World::new();
    world_setup::spawn_player(&mut world, &PlayerConfig::default());
    spawn_test_boid(&mut world, Vec3::ZERO, Vec3::Z);

    let report = snapshot::build_report(&world, &SimTime::default(), Vec::new(), false);
    assert_eq!(report.population.boids, 1);
    let player = report.player.unwrap();
    assert_eq!(player.health, player.max_health);
    assert!(!player.moveable);

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"population\""));
}
