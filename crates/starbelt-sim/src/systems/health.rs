//! Health and damage pipeline.
//!
//! `apply_damage` consumes pending damage; `remove_depleted` handles
//! whatever ran out of health. Notifications go to the mailbox, which the
//! engine publishes at the end of the tick.

use hecs::World;

use starbelt_core::components::{Damage, DespawnPending, Health, Player, PlayerMove};

use crate::mailbox::Mailbox;
use crate::mutation::MutationQueue;

/// Subtract pending damage and queue its removal.
/// Player health changes are posted as a fraction of max health.
pub fn apply_damage(world: &mut World, mailbox: &mut Mailbox, queue: &mut MutationQueue) {
    let lane = queue.lane();
    for (entity, (health, damage, player, pending)) in world.query_mut::<(
        &mut Health,
        &Damage,
        Option<&Player>,
        Option<&DespawnPending>,
    )>() {
        if pending.is_some() {
            continue;
        }

        health.current -= damage.amount;
        lane.remove_one::<Damage>(entity);

        if player.is_some() && health.max > 0 {
            mailbox.post_health(health.current as f32 / health.max as f32);
        }
    }
}

/// Handle entities at or below zero health.
///
/// Anything but a player is tagged for despawn and scores its max health.
/// A player that can still move is refilled instead and ends the run; a
/// frozen player is left alone so the run ends only once.
pub fn remove_depleted(world: &mut World, mailbox: &mut Mailbox, queue: &mut MutationQueue) {
    let lane = queue.lane();
    for (entity, (health, player, movement, pending)) in world.query_mut::<(
        &mut Health,
        Option<&Player>,
        Option<&PlayerMove>,
        Option<&DespawnPending>,
    )>() {
        if health.current > 0 || pending.is_some() {
            continue;
        }

        if player.is_some() {
            if movement.is_some_and(|m| m.moveable) {
                health.current = health.max;
                mailbox.post_game_over();
                log::info!("player destroyed, game over");
            }
        } else {
            lane.insert_one(entity, DespawnPending);
            mailbox.post_score(health.max);
        }
    }
}
