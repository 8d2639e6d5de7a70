//! Flocking for STARBELT enemy boids.
//!
//! Implements neighbour accumulation, obstacle avoidance over a fixed
//! direction table, steering forces and speed-clamped integration.

pub mod avoidance;
pub mod flock;
pub mod steering;

pub use starbelt_core as core;
