//! Input translation: raw key state into player intent.
//!
//! Writes movement and shooting intent onto every player ship. Inputs with
//! effects beyond the ship are only collected here; the engine dispatches
//! them after the pass.

use glam::Vec3;
use hecs::World;

use starbelt_core::commands::InputSample;
use starbelt_core::components::{Health, Player, PlayerMove, PlayerShoot};
use starbelt_core::enums::SpecialInput;

/// Translate `input` and return the special inputs seen this tick.
///
/// Ending a run is only accepted while the ship can move, and refills its
/// health on the spot.
pub fn run(world: &mut World, input: &InputSample) -> Vec<SpecialInput> {
    let mut special = Vec::new();

    for (_entity, (_player, movement, shoot, health)) in
        world.query_mut::<(&Player, &mut PlayerMove, &mut PlayerShoot, &mut Health)>()
    {
        shoot.is_shooting = input.shoot;

        movement.forward_factor = input.forward_factor();
        movement.rotation = Vec3::new(input.roll(), input.pitch(), input.yaw());

        if input.end_game && movement.moveable {
            special.push(SpecialInput::EndGame);
            health.current = health.max;
        }
        if input.close_game {
            special.push(SpecialInput::CloseGame);
        }
    }

    special
}
