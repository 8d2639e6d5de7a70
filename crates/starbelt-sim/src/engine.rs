//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs ECS world and the physics backend,
//! takes input samples and inbound game events, runs all systems in a fixed
//! order and returns a `TickReport`. Completely headless, enabling
//! deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};

use starbelt_core::commands::InputSample;
use starbelt_core::config::SimConfig;
use starbelt_core::constants::{DT, PLAYER_ASTEROID_CHECKS_PER_SEC};
use starbelt_core::enums::SpecialInput;
use starbelt_core::events::GameEvent;
use starbelt_core::state::TickReport;
use starbelt_core::types::SimTime;

use crate::mailbox::Mailbox;
use crate::mutation::MutationQueue;
use crate::physics::{Physics, SphereWorld};
use crate::systems;
use crate::systems::collision::RateLimiter;
use crate::templates::TemplateCache;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    physics: Box<dyn Physics>,
    time: SimTime,
    time_scale: f64,
    input: InputSample,
    event_queue: VecDeque<GameEvent>,
    outbound: Vec<GameEvent>,
    close_requested: bool,
    mutations: MutationQueue,
    templates: TemplateCache,
    bump_limiter: RateLimiter,
    mailbox: Mailbox,
    despawn_buffer: Vec<Entity>,
}

impl SimulationEngine {
    /// Create an engine on the built-in sphere physics.
    pub fn new(config: SimConfig) -> Self {
        Self::with_physics(config, Box::new(SphereWorld::new()))
    }

    /// Create an engine on a caller-supplied physics backend.
    pub fn with_physics(config: SimConfig, physics: Box<dyn Physics>) -> Self {
        let mut world = World::new();
        world_setup::setup_scene(&mut world, &config);

        Self {
            world,
            physics,
            time: SimTime::default(),
            time_scale: config.time_scale,
            input: InputSample::default(),
            event_queue: VecDeque::new(),
            outbound: Vec::new(),
            close_requested: false,
            mutations: MutationQueue::new(),
            templates: TemplateCache::default(),
            bump_limiter: RateLimiter::per_second(PLAYER_ASTEROID_CHECKS_PER_SEC),
            mailbox: Mailbox::new(),
            despawn_buffer: Vec::new(),
        }
    }

    /// Queue an inbound game event for the next tick boundary.
    pub fn queue_event(&mut self, event: GameEvent) {
        self.event_queue.push_back(event);
    }

    /// Set the input sample used by the next tick.
    /// Held keys follow the latest sample. Key-down fields accumulate until a
    /// tick consumes them.
    pub fn set_input(&mut self, input: InputSample) {
        self.input = self.input.latch(input);
    }

    /// Advance the simulation by one tick and return the resulting report.
    pub fn tick(&mut self) -> TickReport {
        self.process_events();
        self.run_systems(DT);
        self.time.advance(DT);
        self.input = self.input.held();

        let events = std::mem::take(&mut self.outbound);
        systems::snapshot::build_report(&self.world, &self.time, events, self.close_requested)
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.clamp(0.0, 4.0);
    }

    /// True once the close-game input has been seen.
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for tests that stage entities directly.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Process all queued inbound events.
    fn process_events(&mut self) {
        while let Some(event) = self.event_queue.pop_front() {
            self.handle_event(event);
        }
    }

    /// Apply a single game event to the world.
    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::GameStart { asteroids, enemies } => {
                systems::game_flow::start_game(&mut self.world, asteroids, enemies);
            }
            GameEvent::GameEnd { state } => {
                systems::game_flow::end_game(&mut self.world, state, &mut self.mutations);
            }
            GameEvent::HealthDisplay { .. } | GameEvent::ScoreIncrease { .. } => {
                log::trace!("ignoring inbound {:?}", event.kind());
            }
        }
    }

    /// Act on special inputs collected by the input pass.
    fn dispatch_special_inputs(&mut self, inputs: Vec<SpecialInput>) {
        for input in inputs {
            match input {
                SpecialInput::EndGame => {
                    self.outbound.push(GameEvent::HealthDisplay { percentage: 1.0 });
                    let end = GameEvent::GameEnd { state: None };
                    self.outbound.push(end);
                    self.handle_event(end);
                }
                SpecialInput::CloseGame => {
                    if !self.close_requested {
                        log::info!("close requested");
                    }
                    self.close_requested = true;
                }
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f32) {
        // 1. Input translation, then side effects of special inputs
        let special = systems::input::run(&mut self.world, &self.input);
        self.dispatch_special_inputs(special);
        // 2. Player motion
        systems::player_motion::run(&mut self.world, dt);
        // 3. Shooting
        systems::shooting::run(&self.world, &mut self.templates.projectile, &mut self.mutations);
        // 4. Spawners
        systems::asteroid_spawner::run(&mut self.world, &mut self.templates.asteroids, &mut self.mutations);
        systems::boid_spawner::run(&mut self.world, &mut self.templates.boid, &mut self.mutations);
        // 5. Spawn barrier: new bodies must exist before physics sees the world
        self.mutations.flush(&mut self.world);
        // 6. Physics sync
        self.physics.sync(&self.world);
        // 7. Flocking, orbital motion
        systems::flocking::run(&mut self.world, &*self.physics, dt);
        systems::orbit::run(&mut self.world, dt);
        // 8. Physics step
        let contacts = self.physics.step(&mut self.world, dt);
        // 9. Collision resolution, then damage barrier
        systems::collision::run(
            &self.world,
            &contacts,
            &mut self.bump_limiter,
            self.time.elapsed_secs,
            &mut self.mutations,
        );
        self.mutations.flush(&mut self.world);
        // 10. Health
        systems::health::apply_damage(&mut self.world, &mut self.mailbox, &mut self.mutations);
        systems::health::remove_depleted(&mut self.world, &mut self.mailbox, &mut self.mutations);
        // 11. Lifetime
        systems::lifetime::run(&mut self.world, dt, &mut self.mutations);
        // 12. Publish notifications; a lost game also ends the run here
        self.mutations.flush(&mut self.world);
        let published = self.outbound.len();
        self.mailbox.drain_into(&mut self.outbound);
        let own_game_ends: Vec<GameEvent> = self.outbound[published..]
            .iter()
            .copied()
            .filter(|event| matches!(event, GameEvent::GameEnd { .. }))
            .collect();
        for event in own_game_ends {
            self.handle_event(event);
        }
        self.mutations.flush(&mut self.world);
        // 13. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }
}
