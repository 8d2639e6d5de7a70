//! Core types and definitions for the STARBELT simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, input samples, game events, per-tick reports, configuration
//! and constants. It contains no systems and no ECS world.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
