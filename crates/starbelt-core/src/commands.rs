//! Player input sampled by the host each frame.
//!
//! Input polling itself is outside the simulation; the host fills an
//! `InputSample` and hands it to the engine before the next tick.

use serde::{Deserialize, Serialize};

/// Raw control state for one frame.
///
/// Held keys are level-triggered; `shoot`, `end_game` and `close_game` are
/// expected to be true only on the frame the key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSample {
    pub forward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub look_up: bool,
    pub look_down: bool,
    pub roll_left: bool,
    pub roll_right: bool,
    pub shoot: bool,
    pub end_game: bool,
    pub close_game: bool,
}

impl InputSample {
    /// Forward factor in {0, 1}.
    pub fn forward_factor(&self) -> f32 {
        axis(self.forward, false)
    }

    /// Roll intent in {-1, 0, 1}.
    pub fn roll(&self) -> f32 {
        axis(self.roll_right, self.roll_left)
    }

    /// Pitch intent in {-1, 0, 1}.
    pub fn pitch(&self) -> f32 {
        axis(self.look_down, self.look_up)
    }

    /// Yaw intent in {-1, 0, 1}.
    pub fn yaw(&self) -> f32 {
        axis(self.turn_right, self.turn_left)
    }

    /// The same sample with the key-down fields cleared, for frames where
    /// the host sends nothing new.
    pub fn held(&self) -> Self {
        Self {
            shoot: false,
            end_game: false,
            close_game: false,
            ..*self
        }
    }

    /// `next`, keeping any key-down field already set on `self`.
    pub fn latch(&self, next: Self) -> Self {
        Self {
            shoot: self.shoot || next.shoot,
            end_game: self.end_game || next.end_game,
            close_game: self.close_game || next.close_game,
            ..next
        }
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}
