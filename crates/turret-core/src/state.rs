//! World snapshot: the complete visible state produced after each tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::BehaviorState;
use crate::events::TurretEventRecord;
use crate::types::{EntityId, Position, SimTime, Velocity};

/// Complete simulation state after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub paused: bool,
    pub turrets: Vec<TurretView>,
    pub targets: Vec<TargetView>,
    pub projectiles: Vec<ProjectileView>,
    pub events: Vec<TurretEventRecord>,
}

/// Diagnostic overlay of a turret. Read-only, no behavioral effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurretDiagnostics {
    pub state: BehaviorState,
    pub target: Option<EntityId>,
    pub vision_radius: f64,
    /// Last computed aim point, if any.
    pub aim_point: Option<Position>,
    pub estimated_target_velocity: Velocity,
    pub head_forward: DVec3,
    pub gun_forward: DVec3,
    pub gun_pivot: Position,
    pub allow_fire: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurretView {
    pub id: EntityId,
    pub position: Position,
    #[serde(flatten)]
    pub diagnostics: TurretDiagnostics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub id: EntityId,
    pub tag: String,
    pub position: Position,
    pub velocity: Velocity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub source: EntityId,
    pub position: Position,
    pub velocity: Velocity,
    pub remaining_secs: f64,
}
