//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs ECS world, applies queued commands,
//! runs all systems, and produces `SimSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use turret_control::{Turret, TurretBuilder};
use turret_core::commands::SimCommand;
use turret_core::components::{Tag, Target, TurretUnit};
use turret_core::constants::TICK_RATE;
use turret_core::error::TurretError;
use turret_core::events::TurretEventRecord;
use turret_core::state::SimSnapshot;
use turret_core::types::{EntityId, Position, SimTime, Velocity};

use crate::scene::{entity_id, entity_of};
use crate::systems;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Ticks per simulated second.
    pub tick_rate: u32,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: TICK_RATE,
            time_scale: 1.0,
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    paused: bool,
    base_dt: f64,
    time_scale: f64,
    rng: ChaCha8Rng,
    command_queue: VecDeque<SimCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<TurretEventRecord>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            paused: false,
            base_dt: 1.0 / f64::from(config.tick_rate.max(1)),
            time_scale: config.time_scale.clamp(0.0, 4.0),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.process_commands();

        let dt = self.base_dt * self.time_scale;
        if !self.paused && dt > 0.0 {
            self.run_systems(dt);
            self.time.advance(dt);
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(&self.world, &self.time, self.paused, events)
    }

    /// Build and place a turret. Fails if the builder lacks a mount or
    /// carries an invalid config.
    pub fn place_turret(
        &mut self,
        position: Position,
        builder: TurretBuilder,
    ) -> Result<EntityId, TurretError> {
        let turret = builder.build()?;
        let entity = world_setup::spawn_turret(&mut self.world, position, turret);
        log::debug!("placed turret {} at {:?}", entity_id(entity), position);
        Ok(entity_id(entity))
    }

    /// Remove a turret. Its acquisition and fire timers go with it.
    pub fn remove_turret(&mut self, turret: EntityId) -> Result<(), TurretError> {
        let entity = self.live_entity::<TurretUnit>(turret)?;
        let _ = self.world.despawn(entity);
        log::debug!("removed turret {turret}");
        Ok(())
    }

    /// Spawn a tagged target moving at constant velocity.
    pub fn spawn_target(
        &mut self,
        tag: impl Into<String>,
        position: Position,
        velocity: Velocity,
    ) -> EntityId {
        entity_id(world_setup::spawn_target(&mut self.world, tag, position, velocity))
    }

    /// Spawn a ring of randomly heading targets from the seeded RNG.
    pub fn spawn_target_swarm(&mut self, tag: &str, count: u32, radius: f64, speed: f64) -> Vec<EntityId> {
        world_setup::spawn_target_swarm(&mut self.world, &mut self.rng, tag, count, radius, speed)
            .into_iter()
            .map(entity_id)
            .collect()
    }

    /// Read-only access to a placed turret.
    pub fn turret(&self, id: EntityId) -> Option<hecs::Ref<'_, Turret>> {
        self.world.get::<&Turret>(entity_of(id)?).ok()
    }

    /// Whether the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Resolve `id` to a live entity carrying component `T`.
    fn live_entity<T: hecs::Component>(&self, id: EntityId) -> Result<hecs::Entity, TurretError> {
        let entity = entity_of(id).ok_or(TurretError::UnknownEntity(id))?;
        match self.world.entity(entity) {
            Ok(found) if found.has::<T>() => Ok(entity),
            _ => Err(TurretError::UnknownEntity(id)),
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single command. Commands naming a missing entity are dropped.
    fn handle_command(&mut self, command: SimCommand) {
        match command {
            SimCommand::SpawnTarget {
                tag,
                position,
                velocity,
            } => {
                self.spawn_target(tag, position, velocity);
            }
            SimCommand::SpawnTargetSwarm {
                tag,
                count,
                radius,
                speed,
            } => {
                self.spawn_target_swarm(&tag, count, radius, speed);
            }
            SimCommand::RemoveTarget { target } => match self.live_entity::<Target>(target) {
                Ok(entity) => {
                    let _ = self.world.despawn(entity);
                }
                Err(err) => log::warn!("RemoveTarget ignored: {err}"),
            },
            SimCommand::RetagTarget { target, tag } => match self.live_entity::<Target>(target) {
                Ok(entity) => {
                    if let Ok(mut current) = self.world.get::<&mut Tag>(entity) {
                        current.0 = tag;
                    }
                }
                Err(err) => log::warn!("RetagTarget ignored: {err}"),
            },
            SimCommand::SetTargetVelocity { target, velocity } => {
                match self.live_entity::<Target>(target) {
                    Ok(entity) => {
                        if let Ok(mut current) = self.world.get::<&mut Velocity>(entity) {
                            *current = velocity;
                        }
                    }
                    Err(err) => log::warn!("SetTargetVelocity ignored: {err}"),
                }
            }
            SimCommand::RemoveTurret { turret } => {
                if let Err(err) = self.remove_turret(turret) {
                    log::warn!("RemoveTurret ignored: {err}");
                }
            }
            SimCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, 4.0);
            }
            SimCommand::Pause => {
                self.paused = true;
            }
            SimCommand::Resume => {
                self.paused = false;
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        // 1. Turret control (acquisition, FSM, aim, fire requests)
        systems::turret_control::run(
            &mut self.world,
            self.time.elapsed_secs,
            dt,
            self.time.tick,
            &mut self.events,
        );
        // 2. Movement integration
        systems::movement::run(&mut self.world, dt);
        // 3. Projectile lifetime and world bounds
        systems::cleanup::run(&mut self.world, dt, &mut self.despawn_buffer);
    }
}
