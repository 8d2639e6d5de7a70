//! STARBELT headless runner.
//!
//! Drives the simulation engine on its own thread at the tick rate, feeds
//! it input and game events over a channel, and reports outbound events
//! through an `EventBus`.

pub mod demo;
pub mod game_loop;
pub mod state;

pub use starbelt_core as core;
