//! Core types and definitions for the turret simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, configuration, commands, snapshots, events,
//! errors and constants. It has no dependency on an ECS or runtime.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
