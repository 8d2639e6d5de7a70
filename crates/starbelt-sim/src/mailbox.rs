//! Notifications raised inside the tick and published at its end.

use starbelt_core::events::GameEvent;

/// Typed queue drained into outbound events once per tick.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Mailbox {
    health: Vec<f32>,
    scores: Vec<i32>,
    game_over: bool,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Player health changed to `percentage` of max.
    pub fn post_health(&mut self, percentage: f32) {
        self.health.push(percentage);
    }

    pub fn post_score(&mut self, amount: i32) {
        self.scores.push(amount);
    }

    /// Idempotent within a tick.
    pub fn post_game_over(&mut self) {
        self.game_over = true;
    }

    pub fn is_empty(&self) -> bool {
        self.health.is_empty() && self.scores.is_empty() && !self.game_over
    }

    /// Move everything into `events`: health displays, then score
    /// increases, then at most one lost-game `GameEnd`.
    pub fn drain_into(&mut self, events: &mut Vec<GameEvent>) {
        events.extend(
            self.health
                .drain(..)
                .map(|percentage| GameEvent::HealthDisplay { percentage }),
        );
        events.extend(
            self.scores
                .drain(..)
                .map(|amount| GameEvent::ScoreIncrease { amount }),
        );
        if std::mem::take(&mut self.game_over) {
            events.push(GameEvent::GameEnd { state: Some(true) });
        }
    }
}
