//! Scripted pilot for the headless runner.
//!
//! Flies forward, weaves left and right on a fixed period and fires a pair
//! every quarter second. Key-down fields are set on single frames only.

use starbelt_core::commands::InputSample;

/// Frames per weave cycle.
const WEAVE_PERIOD: u64 = 240;

/// Frames between shots.
const SHOT_INTERVAL: u64 = 15;

/// Input for frame `frame` of the demo flight.
pub fn demo_input(frame: u64) -> InputSample {
    let phase = frame % WEAVE_PERIOD;
    InputSample {
        forward: true,
        turn_left: (30..60).contains(&phase),
        turn_right: (150..180).contains(&phase),
        look_up: (90..100).contains(&phase),
        look_down: (200..210).contains(&phase),
        shoot: frame % SHOT_INTERVAL == 0,
        ..Default::default()
    }
}

/// Input that asks the simulation to close.
pub fn close_input() -> InputSample {
    InputSample {
        close_game: true,
        ..Default::default()
    }
}
