//! Fire controller: rate-limited projectile spawn requests.
//!
//! The deferred re-enable of the fire latch is a next-eligible timestamp
//! compared against the sim clock. Dropping the gate drops the timer.

use glam::{DQuat, DVec3};

use turret_core::config::TurretConfig;
use turret_core::constants::TIME_EPSILON;
use turret_core::types::EntityId;

use crate::aim::MountRig;

/// Handle returned by the projectile subsystem. The turret keeps no ownership.
pub type ProjectileHandle = EntityId;

/// One-shot value handed to the projectile subsystem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawnRequest {
    /// Gun pivot in world space.
    pub position: DVec3,
    /// Rotation taking the projectile's forward axis onto the gun's forward axis.
    pub orientation: DQuat,
    /// Unit travel direction (the gun's forward axis).
    pub direction: DVec3,
    pub speed: f64,
}

impl ProjectileSpawnRequest {
    pub fn velocity(&self) -> DVec3 {
        self.direction * self.speed
    }
}

/// The projectile subsystem's spawn entry point.
pub trait ProjectileSpawner {
    fn spawn(&mut self, request: ProjectileSpawnRequest) -> ProjectileHandle;
}

/// Fire latch with a next-eligible time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireGate {
    ready_at: f64,
}

impl Default for FireGate {
    fn default() -> Self {
        Self {
            ready_at: f64::NEG_INFINITY,
        }
    }
}

impl FireGate {
    pub fn allow_fire(&self, now: f64) -> bool {
        now + TIME_EPSILON >= self.ready_at
    }

    /// Latch the gate if open. Reopens `fire_rate` seconds after `now`.
    pub fn try_fire(&mut self, now: f64, fire_rate: f64) -> bool {
        if !self.allow_fire(now) {
            return false;
        }
        self.ready_at = now + fire_rate;
        true
    }

    /// Sim time at which the gate reopens, if it has ever fired.
    pub fn ready_at(&self) -> Option<f64> {
        self.ready_at.is_finite().then_some(self.ready_at)
    }
}

/// Build the spawn request for the rig's current pose.
pub fn spawn_request(config: &TurretConfig, rig: &MountRig, base: DVec3) -> ProjectileSpawnRequest {
    let direction = rig.gun_forward().normalize();
    ProjectileSpawnRequest {
        position: rig.gun_pivot(base),
        orientation: DQuat::from_rotation_arc(config.projectile_forward.normalize(), direction),
        direction,
        speed: config.projectile_speed,
    }
}

/// Issue a shot if the gate is open; dropped silently otherwise.
pub fn request_shot<P>(
    gate: &mut FireGate,
    now: f64,
    config: &TurretConfig,
    rig: &MountRig,
    base: DVec3,
    spawner: &mut P,
) -> Option<ProjectileHandle>
where
    P: ProjectileSpawner + ?Sized,
{
    if !gate.try_fire(now, config.fire_rate) {
        return None;
    }
    Some(spawner.spawn(spawn_request(config, rig, base)))
}
