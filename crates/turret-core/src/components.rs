//! ECS components for hecs entities.
//!
//! Components are plain data structs with no behavior.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Category label used by tag filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag(pub String);

/// Marks an entity as something turrets may acquire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Target;

/// Marks an entity as a turret emplacement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TurretUnit;

/// A projectile handed off by a turret.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    /// Turret that fired it.
    pub source: EntityId,
    /// Muzzle speed (m/s).
    pub speed: f64,
    /// Seconds until removal.
    pub remaining_secs: f64,
}
