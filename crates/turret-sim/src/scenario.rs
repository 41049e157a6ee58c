//! Scenario files: a TOML description of turrets and targets to load into
//! a fresh engine.
//!
//! ```toml
//! [sim]
//! seed = 7
//! duration_secs = 5.0
//!
//! [[turret]]
//! position = { x = 0.0, y = 0.0, z = 0.0 }
//! vision_radius = 25.0
//! [turret.head]
//! [turret.gun]
//!
//! [[target]]
//! tag = "Enemy"
//! position = { x = 0.0, y = 15.0, z = 1.5 }
//! velocity = { x = 3.0, y = 0.0, z = 0.0 }
//! ```

use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use turret_control::{GunMount, HeadMount, TurretBuilder};
use turret_core::config::TurretConfig;
use turret_core::constants::TICK_RATE;
use turret_core::error::{ConfigError, TurretError};
use turret_core::types::{Position, Velocity};

use crate::engine::{SimConfig, SimulationEngine};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    pub sim: SimSettings,
    #[serde(rename = "turret")]
    pub turrets: Vec<TurretSpec>,
    #[serde(rename = "target")]
    pub targets: Vec<TargetSpec>,
    #[serde(rename = "swarm")]
    pub swarms: Vec<SwarmSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimSettings {
    pub seed: u64,
    pub tick_rate: u32,
    pub time_scale: f64,
    /// How long a run of this scenario lasts.
    pub duration_secs: f64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: TICK_RATE,
            time_scale: 1.0,
            duration_secs: 10.0,
        }
    }
}

/// A turret emplacement. Config fields sit directly in the `[[turret]]` table,
/// so unknown keys are caught by `check_turret_keys` rather than serde.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurretSpec {
    #[serde(default)]
    pub position: Position,
    #[serde(flatten)]
    pub config: TurretConfig,
    pub head: Option<MountSpec>,
    pub gun: Option<MountSpec>,
}

/// A mount table. `angle` is the initial yaw of a head or pitch of a gun.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MountSpec {
    pub offset: Option<DVec3>,
    pub angle: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSpec {
    pub tag: String,
    pub position: Position,
    #[serde(default)]
    pub velocity: Velocity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwarmSpec {
    pub tag: String,
    pub count: u32,
    pub radius: f64,
    pub speed: f64,
}

impl Scenario {
    /// Read and parse a scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse a scenario, rejecting unknown keys, and validate every turret config in it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let scenario: Scenario = toml::from_str(text)?;
        check_turret_keys(text)?;
        for turret in &scenario.turrets {
            turret.config.validate()?;
        }
        Ok(scenario)
    }

    /// Number of ticks covering `duration_secs`.
    pub fn tick_count(&self) -> u64 {
        (self.sim.duration_secs.max(0.0) * f64::from(self.sim.tick_rate)).round() as u64
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            seed: self.sim.seed,
            tick_rate: self.sim.tick_rate,
            time_scale: self.sim.time_scale,
        }
    }

    /// Build an engine with every turret, target and swarm placed.
    pub fn build_engine(&self) -> Result<SimulationEngine, TurretError> {
        let mut engine = SimulationEngine::new(self.sim_config());
        for turret in &self.turrets {
            engine.place_turret(turret.position, turret.builder())?;
        }
        for target in &self.targets {
            engine.spawn_target(target.tag.clone(), target.position, target.velocity);
        }
        for swarm in &self.swarms {
            engine.spawn_target_swarm(&swarm.tag, swarm.count, swarm.radius, swarm.speed);
        }
        log::info!(
            "scenario ready: {} turrets, {} targets, {} swarms",
            self.turrets.len(),
            self.targets.len(),
            self.swarms.len()
        );
        Ok(engine)
    }
}

impl TurretSpec {
    /// Builder carrying only the mounts this table declares.
    pub fn builder(&self) -> TurretBuilder {
        let mut builder = TurretBuilder::new(self.config.clone());
        if let Some(head) = &self.head {
            let mount = head.offset.map(HeadMount::new).unwrap_or_default();
            builder = builder.head(mount.with_yaw(head.angle));
        }
        if let Some(gun) = &self.gun {
            let mount = gun.offset.map(GunMount::new).unwrap_or_default();
            builder = builder.gun(mount.with_pitch(gun.angle));
        }
        builder
    }
}

/// Keys a `[[turret]]` table holds besides the flattened config fields.
const TURRET_KEYS: &[&str] = &["position", "head", "gun"];

/// Reject `[[turret]]` keys that neither the table nor `TurretConfig` knows.
fn check_turret_keys(text: &str) -> Result<(), ConfigError> {
    let document: toml::Table = toml::from_str(text)?;
    let turrets = document
        .get("turret")
        .and_then(toml::Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for table in turrets.iter().filter_map(toml::Value::as_table) {
        let unknown = table.keys().find(|key| {
            !TURRET_KEYS.contains(&key.as_str()) && !TurretConfig::FIELDS.contains(&key.as_str())
        });
        if let Some(key) = unknown {
            return Err(ConfigError::UnknownKey {
                table: "turret",
                key: key.clone(),
            });
        }
    }
    Ok(())
}
