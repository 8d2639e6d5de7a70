//! Physics collaborator.
//!
//! The simulation only needs two things from a physics engine: sphere casts
//! for boid obstacle avoidance, and the list of contact pairs produced by a
//! step. `SphereWorld` is the built-in backend used by the headless runner
//! and the tests: every collider is a sphere, bodies move linearly, and
//! contacts are plain overlap tests.

use glam::Vec3;
use hecs::{Entity, World};

use starbelt_core::components::{Collider, DespawnPending};
use starbelt_core::enums::{CollisionFilter, CollisionLayer};
use starbelt_core::types::Transform;

use crate::systems::movement;

/// Two bodies touching after a physics step. Order carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
}

/// Read-only cast queries, shared across worker threads.
pub trait CastQuery: Sync {
    /// Sweep a sphere of `radius` from `origin` along `direction` for up to
    /// `max_distance`. True if any collider accepted by `filter` is touched.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        filter: CollisionFilter,
    ) -> bool;
}

/// A physics backend driven once per tick.
pub trait Physics: CastQuery + Send {
    /// Rebuild the cast world from the current transforms.
    fn sync(&mut self, world: &World);

    /// Integrate velocities by `dt` and report this step's contacts.
    fn step(&mut self, world: &mut World, dt: f32) -> Vec<CollisionEvent>;
}

#[derive(Debug, Clone, Copy)]
struct Proxy {
    entity: Entity,
    position: Vec3,
    radius: f32,
    layer: CollisionLayer,
    collides_with: CollisionLayer,
}

impl Proxy {
    fn filter(&self) -> CollisionFilter {
        CollisionFilter {
            belongs_to: self.layer,
            collides_with: self.collides_with,
        }
    }
}

/// Sphere-only physics backend.
#[derive(Debug, Default)]
pub struct SphereWorld {
    proxies: Vec<Proxy>,
}

impl SphereWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of colliders in the cast world.
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    fn rebuild(&mut self, world: &World) {
        self.proxies.clear();

        let mut query = world.query::<(&Transform, &Collider, Option<&DespawnPending>)>();
        for (entity, (transform, collider, pending)) in query.iter() {
            if pending.is_some() {
                continue;
            }
            self.proxies.push(Proxy {
                entity,
                position: transform.position,
                radius: collider.radius,
                layer: collider.layer,
                collides_with: collider.collides_with,
            });
        }

        // Stable pair order independent of archetype layout.
        self.proxies.sort_by_key(|p| p.entity.to_bits());
    }

    fn overlapping_pairs(&self) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        for (i, a) in self.proxies.iter().enumerate() {
            for b in &self.proxies[i + 1..] {
                if !a.filter().accepts(b.layer, b.collides_with) {
                    continue;
                }
                let reach = a.radius + b.radius;
                if a.position.distance_squared(b.position) < reach * reach {
                    events.push(CollisionEvent {
                        a: a.entity,
                        b: b.entity,
                    });
                }
            }
        }
        events
    }
}

impl CastQuery for SphereWorld {
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        filter: CollisionFilter,
    ) -> bool {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return false;
        }

        self.proxies.iter().any(|proxy| {
            filter.accepts(proxy.layer, proxy.collides_with)
                && sweep_hits(origin, direction, max_distance, radius + proxy.radius, proxy.position)
        })
    }
}

impl Physics for SphereWorld {
    fn sync(&mut self, world: &World) {
        self.rebuild(world);
    }

    fn step(&mut self, world: &mut World, dt: f32) -> Vec<CollisionEvent> {
        movement::run(world, dt);
        // Flocking and orbits moved bodies after the last sync.
        self.rebuild(world);
        self.overlapping_pairs()
    }
}

/// Ray against a sphere of radius `reach` centred at `centre`.
/// Starting inside the sphere counts as a hit.
fn sweep_hits(origin: Vec3, direction: Vec3, max_distance: f32, reach: f32, centre: Vec3) -> bool {
    let m = origin - centre;
    let c = m.length_squared() - reach * reach;
    if c <= 0.0 {
        return true;
    }

    let b = m.dot(direction);
    if b > 0.0 {
        return false;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return false;
    }

    -b - discriminant.sqrt() <= max_distance
}
