//! ECS components for hecs entities.
//!
//! Components are plain data structs. Game logic lives in systems, not
//! components; the few methods here are constructors and lookups.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::{AsteroidClass, CollisionLayer};

/// Hit points. `current` may dip to zero or below for one tick before removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

/// Damage pending for this tick. At most one per entity; hits accumulate into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage {
    pub amount: i32,
}

/// Per-boid steering state, recomputed every tick except `velocity`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoidState {
    pub velocity: Vec3,
    pub acceleration: Vec3,
    /// Sum of neighbour forward vectors.
    pub flock_heading: Vec3,
    /// Sum of neighbour positions.
    pub flock_centre: Vec3,
    /// Accumulated short-range repulsion from close neighbours.
    pub avoidance_heading: Vec3,
    pub num_flockmates: f32,
    pub heading_for_collision: bool,
}

/// Tunable boid parameters. Shared read-only by every boid of a spawner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoidSettings {
    pub min_speed: f32,
    pub max_speed: f32,
    pub perception_radius: f32,
    pub avoidance_radius: f32,
    pub max_steer_force: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub target_weight: f32,
    pub sphere_cast_radius: f32,
    pub collision_avoidance_weight: f32,
    pub collision_avoidance_distance: f32,
}

impl Default for BoidSettings {
    fn default() -> Self {
        Self {
            min_speed: 2.0,
            max_speed: 5.0,
            perception_radius: 2.5,
            avoidance_radius: 1.0,
            max_steer_force: 3.0,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            separation_weight: 1.0,
            target_weight: 1.0,
            sphere_cast_radius: 0.27,
            collision_avoidance_weight: 10.0,
            collision_avoidance_distance: 5.0,
        }
    }
}

/// Marks an entity as an enemy boid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boid {
    /// Damage dealt to a player on contact.
    pub damage: i32,
}

/// Marks an entity as an asteroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asteroid {
    /// Damage dealt to a player on contact.
    pub damage: i32,
}

/// Spawn parameters of an asteroid belt, attached to the belt spawner entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsteroidBelt {
    /// Overwritten by the game-start configuration.
    pub number_of_asteroids: u32,
    pub seed: u64,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub height: f32,
    pub orbit_speed: f32,
    pub clockwise: bool,
}

/// Orbital parameters captured when a belt member is spawned.
/// The pivot is a frozen copy of the belt transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeltObject {
    pub orbit_speed: f32,
    pub clockwise: bool,
    pub parent_position: Vec3,
    pub parent_up: Vec3,
}

/// Edge-triggered spawn flag. Fires once, then resets in the same pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawner {
    pub is_spawning: bool,
}

/// Boid spawn volume, attached next to `Spawner` and `BoidSettings`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoidSpawner {
    /// Overwritten by the game-start configuration.
    pub spawn_count: u32,
    pub spawn_radius: f32,
    pub seed: u64,
}

/// Marks the player ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

/// Marks a player projectile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile;

/// Marks a static obstacle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle;

/// Marks an entity for removal by the cleanup pass at the end of the tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DespawnPending;

/// Age-based lifetime. The entity is removed once `current > max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeToLive {
    pub current: f32,
    pub max: f32,
}

impl TimeToLive {
    pub fn new(max: f32) -> Self {
        Self { current: 0.0, max }
    }
}

/// Movement intent and capabilities of a player ship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerMove {
    /// 0 or 1.
    pub forward_factor: f32,
    /// Roll (x), pitch (y) and yaw (z) intent, each in {-1, 0, 1}.
    pub rotation: Vec3,
    /// Movement is applied only while set. Toggled by game start/end.
    pub moveable: bool,
    pub forward_speed: f32,
    pub turn_speed: f32,
}

/// Shooting intent of a player ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerShoot {
    pub is_shooting: bool,
    /// Toggled by game start/end.
    pub can_shoot: bool,
}

/// Muzzle offsets of the two cannons in ship space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CannonMounts {
    pub first: Vec3,
    pub second: Vec3,
}

/// Sphere collider proxy for the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub radius: f32,
    pub layer: CollisionLayer,
    pub collides_with: CollisionLayer,
}

// --- Templates (prefab registry) ---

/// Instantiation parameters of one asteroid class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsteroidTemplate {
    pub health: i32,
    pub damage: i32,
    pub radius: f32,
}

/// The three asteroid templates used by belt spawners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsteroidCollection {
    pub light: AsteroidTemplate,
    pub medium: AsteroidTemplate,
    pub heavy: AsteroidTemplate,
}

impl AsteroidCollection {
    pub fn template(&self, class: AsteroidClass) -> &AsteroidTemplate {
        match class {
            AsteroidClass::Light => &self.light,
            AsteroidClass::Medium => &self.medium,
            AsteroidClass::Heavy => &self.heavy,
        }
    }
}

/// Instantiation parameters of an enemy boid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoidTemplate {
    pub damage: i32,
    pub radius: f32,
}

/// Instantiation parameters of a player projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileTemplate {
    pub max_duration: f32,
    pub radius: f32,
}
