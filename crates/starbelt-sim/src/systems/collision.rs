//! Collision resolution: turns contact pairs into damage and despawn tags.
//!
//! Every event is classified on its own; events are not deduplicated. Damage
//! aimed at one entity within a tick is summed and written once, on top of
//! any damage still pending from earlier.

use std::collections::BTreeMap;

use hecs::{Component, Entity, World};

use starbelt_core::components::{Asteroid, Boid, Damage, DespawnPending, Player, Projectile};
use starbelt_core::constants::PROJECTILE_DAMAGE;

use crate::mutation::MutationQueue;
use crate::physics::CollisionEvent;

/// Gate that opens at most `rate` times per second of simulation time.
///
/// Each opening pushes the next deadline one interval further, so after a
/// stall the gate opens on consecutive ticks until it has caught up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimiter {
    interval: f64,
    next: f64,
}

impl RateLimiter {
    pub fn per_second(rate: f64) -> Self {
        Self {
            interval: 1.0 / rate,
            next: 0.0,
        }
    }

    pub fn try_fire(&mut self, now: f64) -> bool {
        if now >= self.next {
            self.next += self.interval;
            true
        } else {
            false
        }
    }
}

/// What a contact pair means for the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    ProjectileAsteroid { projectile: Entity, asteroid: Entity },
    PlayerAsteroid { player: Entity, asteroid: Entity },
    PlayerBoid { player: Entity, boid: Entity },
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Player,
    Projectile,
    Asteroid,
    Boid,
    Other,
}

/// Classify one event. Endpoints that are gone or already tagged for
/// despawn make the event a no-op.
pub fn classify(world: &World, event: &CollisionEvent) -> Contact {
    let (a, b) = (event.a, event.b);
    if !is_live(world, a) || !is_live(world, b) {
        return Contact::Ignored;
    }

    match (role(world, a), role(world, b)) {
        (Role::Projectile, Role::Asteroid) => Contact::ProjectileAsteroid {
            projectile: a,
            asteroid: b,
        },
        (Role::Asteroid, Role::Projectile) => Contact::ProjectileAsteroid {
            projectile: b,
            asteroid: a,
        },
        (Role::Player, Role::Asteroid) => Contact::PlayerAsteroid {
            player: a,
            asteroid: b,
        },
        (Role::Asteroid, Role::Player) => Contact::PlayerAsteroid {
            player: b,
            asteroid: a,
        },
        (Role::Player, Role::Boid) => Contact::PlayerBoid { player: a, boid: b },
        (Role::Boid, Role::Player) => Contact::PlayerBoid { player: b, boid: a },
        _ => Contact::Ignored,
    }
}

/// Resolve this step's contacts into queued damage and despawn tags.
///
/// Player-versus-asteroid contacts only count on ticks where `bump_limiter`
/// opens at simulation time `now`.
pub fn run(
    world: &World,
    events: &[CollisionEvent],
    bump_limiter: &mut RateLimiter,
    now: f64,
    queue: &mut MutationQueue,
) {
    // The gate advances every tick, contacts or not.
    let check_bumps = bump_limiter.try_fire(now);
    if events.is_empty() {
        return;
    }

    let mut damage: BTreeMap<Entity, i32> = BTreeMap::new();
    let mut despawn: Vec<Entity> = Vec::new();

    for event in events {
        let contact = classify(world, event);
        log::trace!("collision {:?} / {:?}: {:?}", event.a, event.b, contact);

        match contact {
            Contact::ProjectileAsteroid {
                projectile,
                asteroid,
            } => {
                despawn.push(projectile);
                *damage.entry(asteroid).or_default() += PROJECTILE_DAMAGE;
            }
            Contact::PlayerAsteroid { player, asteroid } => {
                if !check_bumps {
                    continue;
                }
                if let Ok(rock) = world.get::<&Asteroid>(asteroid) {
                    *damage.entry(player).or_default() += rock.damage;
                }
            }
            Contact::PlayerBoid { player, boid } => {
                if let Ok(enemy) = world.get::<&Boid>(boid) {
                    *damage.entry(player).or_default() += enemy.damage;
                }
                despawn.push(boid);
            }
            Contact::Ignored => {}
        }
    }

    let lane = queue.lane();
    for entity in despawn {
        lane.insert_one(entity, DespawnPending);
    }
    for (entity, amount) in damage {
        let pending = world.get::<&Damage>(entity).map_or(0, |d| d.amount);
        lane.insert_one(
            entity,
            Damage {
                amount: pending + amount,
            },
        );
    }
}

fn is_live(world: &World, entity: Entity) -> bool {
    world.contains(entity) && !has::<DespawnPending>(world, entity)
}

fn role(world: &World, entity: Entity) -> Role {
    if has::<Player>(world, entity) {
        Role::Player
    } else if has::<Projectile>(world, entity) {
        Role::Projectile
    } else if has::<Asteroid>(world, entity) {
        Role::Asteroid
    } else if has::<Boid>(world, entity) {
        Role::Boid
    } else {
        Role::Other
    }
}

fn has<T: Component>(world: &World, entity: Entity) -> bool {
    world.get::<&T>(entity).is_ok()
}
