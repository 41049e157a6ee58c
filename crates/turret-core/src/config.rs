//! Turret configuration surface.
//!
//! All values are fixed once a turret is built. Every field has a default
//! so configuration files only need to name what they change.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ConfigError, TurretError};

/// Selects which tagged entities count as candidates.
///
/// In configuration files this is either a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagFilter {
    Exact(String),
    AnyOf(Vec<String>),
}

impl TagFilter {
    pub fn exact(tag: impl Into<String>) -> Self {
        TagFilter::Exact(tag.into())
    }

    pub fn matches(&self, tag: &str) -> bool {
        match self {
            TagFilter::Exact(wanted) => wanted == tag,
            TagFilter::AnyOf(wanted) => wanted.iter().any(|w| w == tag),
        }
    }

    /// True when no tag can ever match.
    pub fn is_empty(&self) -> bool {
        match self {
            TagFilter::Exact(wanted) => wanted.is_empty(),
            TagFilter::AnyOf(wanted) => wanted.iter().all(String::is_empty),
        }
    }
}

impl Default for TagFilter {
    fn default() -> Self {
        TagFilter::exact(DEFAULT_ENEMY_TAG)
    }
}

/// Construction-time turret parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretConfig {
    /// Acquisition radius in meters.
    pub vision_radius: f64,
    /// Max angular speed of both mounts (rad/s).
    pub rotation_speed: f64,
    /// Seconds between shots.
    pub fire_rate: f64,
    /// Projectile muzzle speed (m/s). Must be positive.
    pub projectile_speed: f64,
    /// Which entities are hostile.
    pub enemy_tags: TagFilter,
    /// Seconds between acquisition scans.
    pub search_interval: f64,
    /// Forward axis of the projectile model, rotated onto the gun's forward axis at spawn.
    pub projectile_forward: DVec3,
    /// Idle look-around yaw rate (rad/s); 0 disables it.
    pub idle_scan_rate: f64,
}

impl Default for TurretConfig {
    fn default() -> Self {
        Self {
            vision_radius: DEFAULT_VISION_RADIUS,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            fire_rate: DEFAULT_FIRE_RATE,
            projectile_speed: DEFAULT_PROJECTILE_SPEED,
            enemy_tags: TagFilter::default(),
            search_interval: DEFAULT_SEARCH_INTERVAL,
            projectile_forward: DVec3::Y,
            idle_scan_rate: DEFAULT_IDLE_SCAN_RATE,
        }
    }
}

impl TurretConfig {
    /// Every key a configuration table may set.
    pub const FIELDS: &'static [&'static str] = &[
        "vision_radius",
        "rotation_speed",
        "fire_rate",
        "projectile_speed",
        "enemy_tags",
        "search_interval",
        "projectile_forward",
        "idle_scan_rate",
    ];

    /// Squared vision radius, compared against squared candidate distances.
    pub fn vision_radius_sq(&self) -> f64 {
        self.vision_radius * self.vision_radius
    }

    /// Reject values the turret cannot run with.
    pub fn validate(&self) -> Result<(), TurretError> {
        if !(self.projectile_speed.is_finite() && self.projectile_speed > 0.0) {
            return Err(TurretError::invalid(
                "projectile_speed",
                format!("must be positive, got {}", self.projectile_speed),
            ));
        }
        if !(self.rotation_speed.is_finite() && self.rotation_speed > 0.0) {
            return Err(TurretError::invalid(
                "rotation_speed",
                format!("must be positive, got {}", self.rotation_speed),
            ));
        }
        if !(self.vision_radius.is_finite() && self.vision_radius >= 0.0) {
            return Err(TurretError::invalid(
                "vision_radius",
                format!("must be non-negative, got {}", self.vision_radius),
            ));
        }
        if !(self.fire_rate.is_finite() && self.fire_rate >= 0.0) {
            return Err(TurretError::invalid(
                "fire_rate",
                format!("must be non-negative, got {}", self.fire_rate),
            ));
        }
        if !(self.search_interval.is_finite() && self.search_interval > 0.0) {
            return Err(TurretError::invalid(
                "search_interval",
                format!("must be positive, got {}", self.search_interval),
            ));
        }
        if !(self.idle_scan_rate.is_finite() && self.idle_scan_rate >= 0.0) {
            return Err(TurretError::invalid(
                "idle_scan_rate",
                format!("must be non-negative, got {}", self.idle_scan_rate),
            ));
        }
        if self.enemy_tags.is_empty() {
            return Err(TurretError::invalid("enemy_tags", "filter matches nothing"));
        }
        if !self.projectile_forward.is_finite()
            || self.projectile_forward.length_squared() <= DIRECTION_EPSILON
        {
            return Err(TurretError::invalid(
                "projectile_forward",
                "must be a non-zero direction",
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: TurretConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }
}
