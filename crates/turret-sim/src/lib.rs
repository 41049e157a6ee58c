//! Simulation engine for the turret sandbox.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces `SimSnapshot`s.

pub mod engine;
pub mod scenario;
pub mod scene;
pub mod systems;
pub mod world_setup;

pub use turret_core as core;
pub use engine::{SimConfig, SimulationEngine};
