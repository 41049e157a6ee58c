//! Lead prediction: where to shoot so a constant-speed projectile meets a
//! constant-velocity target.
//!
//! Fixed-point iteration: start at the target, compute the projectile's flight
//! time to the current guess, move the guess to where the target will be after
//! that time, repeat. Converges when the target is slower than the projectile.
//! Ignores projectile drop and target acceleration.

use glam::DVec3;

use turret_core::constants::LEAD_ITERATIONS;
use turret_core::error::TurretError;

/// Lead solver bound to a validated projectile speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadPredictor {
    projectile_speed: f64,
}

impl LeadPredictor {
    pub fn new(projectile_speed: f64) -> Result<Self, TurretError> {
        if !(projectile_speed.is_finite() && projectile_speed > 0.0) {
            return Err(TurretError::invalid(
                "projectile_speed",
                format!("must be positive, got {projectile_speed}"),
            ));
        }
        Ok(Self { projectile_speed })
    }

    pub fn projectile_speed(&self) -> f64 {
        self.projectile_speed
    }

    /// Aim point after `LEAD_ITERATIONS` refinements.
    pub fn predict(&self, target: DVec3, velocity: DVec3, pivot: DVec3) -> DVec3 {
        let mut aim = target;
        for _ in 0..LEAD_ITERATIONS {
            aim = self.refine(target, velocity, pivot, aim);
        }
        aim
    }

    /// Every intermediate aim point, starting with the target itself.
    pub fn trace(&self, target: DVec3, velocity: DVec3, pivot: DVec3) -> Vec<DVec3> {
        let mut points = Vec::with_capacity(LEAD_ITERATIONS + 1);
        let mut aim = target;
        points.push(aim);
        for _ in 0..LEAD_ITERATIONS {
            aim = self.refine(target, velocity, pivot, aim);
            points.push(aim);
        }
        points
    }

    fn refine(&self, target: DVec3, velocity: DVec3, pivot: DVec3, aim: DVec3) -> DVec3 {
        let time_to_target = pivot.distance(aim) / self.projectile_speed;
        target + velocity * time_to_target
    }
}

/// One-shot lead prediction. Fails when `projectile_speed` is not positive.
pub fn predict_intercept(
    target: DVec3,
    velocity: DVec3,
    pivot: DVec3,
    projectile_speed: f64,
) -> Result<DVec3, TurretError> {
    Ok(LeadPredictor::new(projectile_speed)?.predict(target, velocity, pivot))
}
