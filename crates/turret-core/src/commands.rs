//! Commands sent to the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Position, Velocity};

/// All possible world edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    // --- Targets ---
    /// Spawn one tagged target moving at constant velocity.
    SpawnTarget {
        tag: String,
        position: Position,
        velocity: Velocity,
    },
    /// Spawn `count` targets on a ring of `radius` around the origin,
    /// each heading in a random horizontal direction at `speed`.
    SpawnTargetSwarm {
        tag: String,
        count: u32,
        radius: f64,
        speed: f64,
    },
    /// Destroy a target.
    RemoveTarget { target: EntityId },
    /// Change a target's tag.
    RetagTarget { target: EntityId, tag: String },
    /// Change a target's velocity.
    SetTargetVelocity { target: EntityId, velocity: Velocity },

    // --- Turrets ---
    /// Remove a turret along with its pending timers.
    RemoveTurret { turret: EntityId },

    // --- Simulation control ---
    /// Set time scale (1.0 = normal, 0.0 = frozen).
    SetTimeScale { scale: f64 },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
