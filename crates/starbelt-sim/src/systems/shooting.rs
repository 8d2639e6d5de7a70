//! Shooting system: spawns projectiles from both cannons of a firing ship.

use hecs::World;

use starbelt_core::components::{CannonMounts, Player, PlayerShoot, ProjectileTemplate};
use starbelt_core::constants::PROJECTILE_SPEED;
use starbelt_core::types::{Transform, Velocity};

use crate::mutation::MutationQueue;
use crate::templates;
use crate::world_setup;

/// Queue a projectile pair for every player that is shooting and allowed to.
///
/// Projectiles leave each muzzle at `PROJECTILE_SPEED` along the ship's
/// forward, plus the ship's own velocity, and share its orientation.
pub fn run(world: &World, template: &mut Option<ProjectileTemplate>, queue: &mut MutationQueue) {
    let Some(template) = templates::resolve(world, template) else {
        return;
    };

    let lane = queue.lane();
    let mut query = world.query::<(&Player, &Transform, &PlayerShoot, &CannonMounts, &Velocity)>();
    for (_entity, (_player, transform, shoot, mounts, velocity)) in query.iter() {
        if !shoot.is_shooting || !shoot.can_shoot {
            continue;
        }

        let muzzle_velocity = transform.forward() * PROJECTILE_SPEED + velocity.linear;
        for mount in [mounts.first, mounts.second] {
            let muzzle = Transform::new(transform.transform_point(mount), transform.rotation);
            lane.spawn(world_setup::projectile_bundle(&template, muzzle, muzzle_velocity));
        }
        log::trace!("projectile pair queued at {:?}", transform.position);
    }
}
