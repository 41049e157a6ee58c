//! Target acquisition: periodic nearest-candidate scan.

use glam::DVec3;

use turret_core::config::{TagFilter, TurretConfig};
use turret_core::constants::TIME_EPSILON;
use turret_core::types::EntityId;

/// A tagged entity visible to acquisition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: EntityId,
    pub position: DVec3,
}

/// Read-only access to the scene, injected into the turret.
pub trait SceneQuery {
    /// Every live entity whose tag passes `filter`, in no particular order.
    fn candidates(&self, filter: &TagFilter) -> Vec<Candidate>;

    /// Current position of `id`, or `None` once it no longer exists.
    fn locate(&self, id: EntityId) -> Option<DVec3>;
}

/// Nearest candidate within `vision_radius_sq` (squared meters) of `origin`.
///
/// Distances are compared squared; the first of equally near candidates wins.
pub fn select_nearest(
    origin: DVec3,
    candidates: &[Candidate],
    vision_radius_sq: f64,
) -> Option<Candidate> {
    let mut best: Option<(Candidate, f64)> = None;
    for candidate in candidates {
        let dist_sq = origin.distance_squared(candidate.position);
        if dist_sq > vision_radius_sq {
            continue;
        }
        if best.map_or(true, |(_, best_sq)| dist_sq < best_sq) {
            best = Some((*candidate, dist_sq));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Outcome of polling the acquisition timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scan {
    /// Interval has not elapsed yet.
    NotDue,
    /// A scan ran; `None` means nothing qualified.
    Completed(Option<Candidate>),
}

/// Scan scheduler. Runs on the first poll, then every `search_interval`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetAcquisition {
    next_search_at: f64,
}

impl Default for TargetAcquisition {
    fn default() -> Self {
        Self {
            next_search_at: f64::NEG_INFINITY,
        }
    }
}

impl TargetAcquisition {
    pub fn is_due(&self, now: f64) -> bool {
        now + TIME_EPSILON >= self.next_search_at
    }

    /// Sim time of the next scheduled scan.
    pub fn next_search_at(&self) -> f64 {
        self.next_search_at
    }

    /// Scan the scene if the interval has elapsed.
    pub fn poll<S>(&mut self, now: f64, origin: DVec3, config: &TurretConfig, scene: &S) -> Scan
    where
        S: SceneQuery + ?Sized,
    {
        if !self.is_due(now) {
            return Scan::NotDue;
        }
        self.next_search_at = now + config.search_interval;

        let candidates = scene.candidates(&config.enemy_tags);
        Scan::Completed(select_nearest(
            origin,
            &candidates,
            config.vision_radius_sq(),
        ))
    }
}
