//! Scene configuration.
//!
//! Everything not carried by the game-start event is authored here: the
//! player ship, belt and boid spawners, static obstacles and the prefab
//! templates. Loaded from JSON; missing fields fall back to the defaults.

use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::components::{
    AsteroidCollection, AsteroidTemplate, BoidSettings, BoidTemplate, ProjectileTemplate,
};
use crate::constants::*;

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for building a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Initial time scale (1.0 = normal). Used by the host loop.
    pub time_scale: f64,
    /// Counts sent with the game-start event.
    pub start: StartConfig,
    pub player: PlayerConfig,
    pub belts: Vec<BeltConfig>,
    pub boid_spawners: Vec<BoidSpawnerConfig>,
    pub obstacles: Vec<ObstacleConfig>,
    pub prefabs: PrefabConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartConfig {
    pub asteroids: u32,
    pub enemies: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub position: Vec3,
    pub max_health: i32,
    pub forward_speed: f32,
    pub turn_speed: f32,
    pub first_cannon: Vec3,
    pub second_cannon: Vec3,
    pub collider_radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeltConfig {
    pub position: Vec3,
    pub rotation: Quat,
    pub seed: u64,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub height: f32,
    pub orbit_speed: f32,
    pub clockwise: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoidSpawnerConfig {
    pub position: Vec3,
    pub spawn_radius: f32,
    pub seed: u64,
    pub settings: BoidSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub position: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefabConfig {
    pub asteroids: AsteroidCollection,
    pub boid: BoidTemplate,
    pub projectile: ProjectileTemplate,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            start: StartConfig::default(),
            player: PlayerConfig::default(),
            belts: vec![BeltConfig::default()],
            boid_spawners: vec![BoidSpawnerConfig::default()],
            obstacles: Vec::new(),
            prefabs: PrefabConfig::default(),
        }
    }
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            asteroids: 100,
            enemies: 10,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            max_health: PLAYER_MAX_HEALTH,
            forward_speed: PLAYER_FORWARD_SPEED,
            turn_speed: PLAYER_TURN_SPEED,
            first_cannon: Vec3::new(-1.5, 0.0, 2.0),
            second_cannon: Vec3::new(1.5, 0.0, 2.0),
            collider_radius: 1.5,
        }
    }
}

impl Default for BeltConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            seed: 1,
            inner_radius: 40.0,
            outer_radius: 80.0,
            height: 10.0,
            orbit_speed: 0.5,
            clockwise: true,
        }
    }
}

impl Default for BoidSpawnerConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 20.0, 120.0),
            spawn_radius: 10.0,
            seed: BOID_SPAWN_SEED,
            settings: BoidSettings::default(),
        }
    }
}

impl Default for PrefabConfig {
    fn default() -> Self {
        Self {
            asteroids: AsteroidCollection {
                light: AsteroidTemplate {
                    health: 1,
                    damage: 5,
                    radius: 1.0,
                },
                medium: AsteroidTemplate {
                    health: 3,
                    damage: 10,
                    radius: 2.0,
                },
                heavy: AsteroidTemplate {
                    health: 5,
                    damage: 20,
                    radius: 3.5,
                },
            },
            boid: BoidTemplate {
                damage: 10,
                radius: 0.5,
            },
            projectile: ProjectileTemplate {
                max_duration: 2.0,
                radius: 0.2,
            },
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Reject values the systems cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_scale.is_nan() || self.time_scale < 0.0 {
            return Err(invalid(format!("time_scale must be >= 0, got {}", self.time_scale)));
        }
        if self.player.max_health <= 0 {
            return Err(invalid("player.max_health must be positive"));
        }

        for (i, belt) in self.belts.iter().enumerate() {
            if !belt.position.is_finite()
                || !belt.inner_radius.is_finite()
                || !belt.outer_radius.is_finite()
                || !belt.height.is_finite()
                || !belt.orbit_speed.is_finite()
            {
                return Err(invalid(format!("belts[{i}]: values must be finite")));
            }
            let length_sq = belt.rotation.length_squared();
            if !belt.rotation.is_finite() || length_sq < MIN_ROTATION_LENGTH_SQ {
                return Err(invalid(format!(
                    "belts[{i}]: rotation must be a finite, non-zero quaternion"
                )));
            }
            if belt.inner_radius < 0.0 || belt.outer_radius < belt.inner_radius {
                return Err(invalid(format!(
                    "belts[{i}]: need 0 <= inner_radius <= outer_radius"
                )));
            }
            if belt.height < 0.0 {
                return Err(invalid(format!("belts[{i}]: height must be >= 0")));
            }
            if belt.inner_radius == belt.outer_radius || belt.height == 0.0 {
                log::warn!("belts[{i}]: degenerate spawn volume, asteroids will share a radius or height");
            }
        }

        for (i, spawner) in self.boid_spawners.iter().enumerate() {
            let s = &spawner.settings;
            if !settings_finite(s)
                || !spawner.position.is_finite()
                || !spawner.spawn_radius.is_finite()
            {
                return Err(invalid(format!("boid_spawners[{i}]: values must be finite")));
            }
            if s.min_speed < 0.0 || s.max_speed < s.min_speed {
                return Err(invalid(format!(
                    "boid_spawners[{i}]: need 0 <= min_speed <= max_speed"
                )));
            }
            if s.max_steer_force < 0.0 || s.perception_radius < 0.0 || s.avoidance_radius < 0.0 {
                return Err(invalid(format!(
                    "boid_spawners[{i}]: radii and steer force must be >= 0"
                )));
            }
            if spawner.spawn_radius < 0.0 {
                return Err(invalid(format!("boid_spawners[{i}]: spawn_radius must be >= 0")));
            }
        }

        for (i, obstacle) in self.obstacles.iter().enumerate() {
            let radius = obstacle.radius;
            if !obstacle.position.is_finite() || !radius.is_finite() || radius <= 0.0 {
                return Err(invalid(format!("obstacles[{i}]: radius must be finite and positive")));
            }
        }

        let max_duration = self.prefabs.projectile.max_duration;
        if !max_duration.is_finite() || max_duration <= 0.0 {
            return Err(invalid("prefabs.projectile.max_duration must be finite and positive"));
        }

        Ok(())
    }
}

/// Squared quaternion length below which a rotation cannot be normalised.
pub const MIN_ROTATION_LENGTH_SQ: f32 = 1e-8;

fn settings_finite(s: &BoidSettings) -> bool {
    [
        s.min_speed,
        s.max_speed,
        s.perception_radius,
        s.avoidance_radius,
        s.max_steer_force,
        s.alignment_weight,
        s.cohesion_weight,
        s.separation_weight,
        s.target_weight,
        s.sphere_cast_radius,
        s.collision_avoidance_weight,
        s.collision_avoidance_distance,
    ]
    .iter()
    .all(|v| v.is_finite())
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}
