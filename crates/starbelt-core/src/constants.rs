//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Player ---

/// Muzzle speed of projectiles, added to the shooter's velocity (m/s).
pub const PROJECTILE_SPEED: f32 = 45.0;

/// Default player hit points.
pub const PLAYER_MAX_HEALTH: i32 = 100;

/// Default forward speed of the player ship (m/s).
pub const PLAYER_FORWARD_SPEED: f32 = 20.0;

/// Default turn rate of the player ship (rad/s).
pub const PLAYER_TURN_SPEED: f32 = 1.5;

// --- Collisions ---

/// Player-versus-asteroid contacts are resolved at most this many times per second.
pub const PLAYER_ASTEROID_CHECKS_PER_SEC: f64 = 5.0;

/// Damage dealt to an asteroid by one projectile hit.
pub const PROJECTILE_DAMAGE: i32 = 1;

// --- Asteroid belts ---

/// Converts belt orbit speed units into radians per second.
pub const ORBIT_ANGULAR_SCALE: f32 = 0.15;

// --- Boids ---

/// Number of precomputed obstacle-avoidance directions.
pub const AVOIDANCE_DIRECTION_COUNT: usize = 100;

/// Default seed for boid spawn bursts.
pub const BOID_SPAWN_SEED: u64 = 1;

// --- Parallel passes ---

/// Entities per worker chunk in chunked parallel passes.
pub const PAR_CHUNK_SIZE: usize = 256;
