//! Enumeration types used throughout the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Turret behavior state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorState {
    /// No target held. No aiming or firing.
    #[default]
    Idle,
    /// Target held: track, predict, aim and fire every tick.
    Attack,
}

/// The two articulated mounts of a turret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MountKind {
    /// Yaw mount, rotates about the vertical axis.
    Head,
    /// Pitch mount, child of the head.
    Gun,
}

impl fmt::Display for MountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountKind::Head => f.write_str("head"),
            MountKind::Gun => f.write_str("gun"),
        }
    }
}
