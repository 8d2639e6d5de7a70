//! Prefab templates resolved from the registry entity.
//!
//! Spawners look their template up once and keep a copy. The tick on which
//! a template is first found is spent resolving it; spawning starts on the
//! following tick.

use hecs::{Component, World};

use starbelt_core::components::{AsteroidCollection, BoidTemplate, ProjectileTemplate};

/// Per-spawner template cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateCache {
    pub asteroids: Option<AsteroidCollection>,
    pub boid: Option<BoidTemplate>,
    pub projectile: Option<ProjectileTemplate>,
}

/// Return the cached template, or try to resolve it and return `None` for
/// this tick either way.
pub fn resolve<T: Component + Copy>(world: &World, slot: &mut Option<T>) -> Option<T> {
    if let Some(template) = slot {
        return Some(*template);
    }

    *slot = find_first::<T>(world);
    if slot.is_some() {
        log::debug!("resolved template {}", std::any::type_name::<T>());
    }
    None
}

fn find_first<T: Component + Copy>(world: &World) -> Option<T> {
    let mut query = world.query::<&T>();
    let found = query.iter().next().map(|(_, template)| *template);
    found
}
