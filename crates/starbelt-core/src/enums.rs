//! Enumeration and flag types used throughout the simulation.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Physics collision layers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionLayer: u32 {
        const OBSTACLE = 1 << 0;
        const PLAYER = 1 << 1;
        const PROJECTILE = 1 << 2;
        const BOID = 1 << 3;
        const ASTEROID = 1 << 4;
    }
}

/// Layer filter for casts and overlap tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    pub belongs_to: CollisionLayer,
    pub collides_with: CollisionLayer,
}

impl CollisionFilter {
    /// Filter used by boid obstacle-avoidance casts.
    pub const BOID_AVOIDANCE: Self = Self {
        belongs_to: CollisionLayer::BOID,
        collides_with: CollisionLayer::OBSTACLE.union(CollisionLayer::ASTEROID),
    };

    /// Both sides must accept each other.
    pub fn accepts(&self, layer: CollisionLayer, layer_collides_with: CollisionLayer) -> bool {
        self.collides_with.intersects(layer) && layer_collides_with.intersects(self.belongs_to)
    }
}

/// Asteroid size class, selecting one of three templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidClass {
    Light,
    Medium,
    #[default]
    Heavy,
}

impl AsteroidClass {
    /// Map a `0..3` draw onto a class: 1 is light, 2 is medium, anything else heavy.
    pub fn from_draw(draw: u32) -> Self {
        match draw {
            1 => AsteroidClass::Light,
            2 => AsteroidClass::Medium,
            _ => AsteroidClass::Heavy,
        }
    }
}

/// Inputs with side effects outside the simulation, dispatched after the input pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialInput {
    /// End the current run and return to the menu.
    EndGame,
    /// Shut the application down.
    CloseGame,
}
