//! Per-tick velocity estimate from successive target positions.

use glam::DVec3;

use turret_core::types::EntityId;

/// A target position and the sim time it was observed at.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    id: EntityId,
    position: DVec3,
    at: f64,
}

/// Differences the target's position against the previous tick's sample.
///
/// Call `estimate` before the tick's geometry and `record` after it, so the
/// stored sample is always one tick old when the next estimate is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KinematicsTracker {
    sample: Option<Sample>,
    velocity: DVec3,
}

impl KinematicsTracker {
    /// Velocity of `id` given its `current` position observed at sim time `now`.
    ///
    /// Divides by the time since the stored sample was taken. Zero when there is
    /// no earlier sample of the same target, or no time has passed since it: the
    /// first tracked tick never guesses a velocity.
    pub fn estimate(&mut self, id: EntityId, current: DVec3, now: f64) -> DVec3 {
        self.velocity = match self.sample {
            Some(sample) if sample.id == id && now > sample.at => {
                (current - sample.position) / (now - sample.at)
            }
            _ => DVec3::ZERO,
        };
        self.velocity
    }

    pub fn record(&mut self, id: EntityId, position: DVec3, now: f64) {
        self.sample = Some(Sample {
            id,
            position,
            at: now,
        });
    }

    pub fn reset(&mut self) {
        self.sample = None;
        self.velocity = DVec3::ZERO;
    }

    /// Last estimate.
    pub fn velocity(&self) -> DVec3 {
        self.velocity
    }

    pub fn previous_position(&self) -> Option<DVec3> {
        self.sample.map(|sample| sample.position)
    }
}
