//! Simulation engine for STARBELT.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate, and returns
//! a `TickReport` with the outbound game events after every tick.

pub mod engine;
pub mod mailbox;
pub mod mutation;
pub mod physics;
pub mod systems;
pub mod templates;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use starbelt_core as core;

#[cfg(test)]
mod tests;
