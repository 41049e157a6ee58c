//! Turret behavior for the turret simulation.
//!
//! Implements target acquisition, kinematics tracking, lead prediction,
//! bounded-rate mount aiming, rate-limited firing and the Idle/Attack
//! state machine. No ECS dependency: the scene and the projectile
//! subsystem are reached through the `SceneQuery` and `ProjectileSpawner`
//! traits.

pub mod acquisition;
pub mod aim;
pub mod fire;
pub mod fsm;
pub mod kinematics;
pub mod lead;
pub mod math;
pub mod turret;

pub use turret_core as core;

pub use acquisition::{Candidate, SceneQuery};
pub use aim::{GunMount, HeadMount, MountRig};
pub use fire::{ProjectileHandle, ProjectileSpawnRequest, ProjectileSpawner};
pub use turret::{TickContext, TickReport, Turret, TurretBuilder};

#[cfg(test)]
mod tests;
