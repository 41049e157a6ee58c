//! Events emitted by turrets for UI and diagnostics.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Position};

/// Something a turret did during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TurretEvent {
    /// Acquisition found a target while none was held.
    TargetAcquired { target: EntityId, range: f64 },
    /// Acquisition replaced the held target with a nearer one.
    TargetSwitched { from: EntityId, to: EntityId },
    /// Acquisition found nothing in range; the held target was released.
    TargetLost { target: EntityId },
    /// Idle -> Attack.
    Engaged { target: EntityId },
    /// Attack -> Idle.
    Disengaged,
    /// A projectile spawn request was issued.
    ShotFired {
        projectile: EntityId,
        target: EntityId,
        aim_point: Position,
    },
}

/// A turret event stamped with its source and tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurretEventRecord {
    pub turret: EntityId,
    pub tick: u64,
    pub event: TurretEvent,
}
