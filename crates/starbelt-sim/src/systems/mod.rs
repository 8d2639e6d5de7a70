//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only
//! passes). They keep no state of their own: state lives in components, and
//! the few cross-tick values (template caches, the bump limiter, the
//! mailbox) are owned by the engine and passed in.

pub mod asteroid_spawner;
pub mod boid_spawner;
pub mod cleanup;
pub mod collision;
pub mod flocking;
pub mod game_flow;
pub mod health;
pub mod input;
pub mod lifetime;
pub mod movement;
pub mod orbit;
pub mod player_motion;
pub mod shooting;
pub mod snapshot;
