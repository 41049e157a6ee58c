//! The turret: acquisition, kinematics, lead, aim and fire wired to the
//! Idle/Attack state machine.

use glam::DVec3;

use turret_core::config::TurretConfig;
use turret_core::enums::{BehaviorState, MountKind};
use turret_core::error::TurretError;
use turret_core::events::TurretEvent;
use turret_core::state::TurretDiagnostics;
use turret_core::types::{EntityId, Position, Velocity};

use crate::acquisition::{Scan, SceneQuery, TargetAcquisition};
use crate::aim::{self, GunMount, HeadMount, MountRig};
use crate::fire::{self, FireGate, ProjectileHandle, ProjectileSpawner};
use crate::fsm;
use crate::kinematics::KinematicsTracker;
use crate::lead::LeadPredictor;

/// Per-tick inputs supplied by the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Monotonic sim time at the start of this tick (seconds).
    pub now: f64,
    /// Length of this tick (seconds). Bounds the rotation step; velocity
    /// estimates use `now` instead.
    pub dt: f64,
    /// Turret base position.
    pub position: DVec3,
}

/// What a tick produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub events: Vec<TurretEvent>,
    pub shots: Vec<ProjectileHandle>,
}

/// Builds a turret. Both mounts are required.
#[derive(Debug, Clone)]
pub struct TurretBuilder {
    config: TurretConfig,
    head: Option<HeadMount>,
    gun: Option<GunMount>,
}

impl TurretBuilder {
    pub fn new(config: TurretConfig) -> Self {
        Self {
            config,
            head: None,
            gun: None,
        }
    }

    pub fn head(mut self, head: HeadMount) -> Self {
        self.head = Some(head);
        self
    }

    pub fn gun(mut self, gun: GunMount) -> Self {
        self.gun = Some(gun);
        self
    }

    pub fn build(self) -> Result<Turret, TurretError> {
        self.config.validate()?;
        let head = self.head.ok_or(TurretError::MissingMount(MountKind::Head))?;
        let gun = self.gun.ok_or(TurretError::MissingMount(MountKind::Gun))?;
        let lead = LeadPredictor::new(self.config.projectile_speed)?;

        Ok(Turret {
            config: self.config,
            rig: MountRig { head, gun },
            lead,
            state: BehaviorState::default(),
            target: None,
            acquisition: TargetAcquisition::default(),
            kinematics: KinematicsTracker::default(),
            fire_gate: FireGate::default(),
            targeting_position: None,
        })
    }
}

/// An autonomous two-axis turret.
#[derive(Debug, Clone)]
pub struct Turret {
    config: TurretConfig,
    rig: MountRig,
    lead: LeadPredictor,
    state: BehaviorState,
    /// Published by acquisition, read once per tick.
    target: Option<EntityId>,
    acquisition: TargetAcquisition,
    kinematics: KinematicsTracker,
    fire_gate: FireGate,
    /// Last computed aim point.
    targeting_position: Option<DVec3>,
}

impl Turret {
    pub fn builder(config: TurretConfig) -> TurretBuilder {
        TurretBuilder::new(config)
    }

    pub fn config(&self) -> &TurretConfig {
        &self.config
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn rig(&self) -> &MountRig {
        &self.rig
    }

    pub fn targeting_position(&self) -> Option<DVec3> {
        self.targeting_position
    }

    pub fn estimated_target_velocity(&self) -> DVec3 {
        self.kinematics.velocity()
    }

    pub fn previous_target_position(&self) -> Option<DVec3> {
        self.kinematics.previous_position()
    }

    pub fn allow_fire(&self, now: f64) -> bool {
        self.fire_gate.allow_fire(now)
    }

    pub fn next_search_at(&self) -> f64 {
        self.acquisition.next_search_at()
    }

    /// Advance one simulation tick.
    ///
    /// Order: snapshot the published target, run the state machine and the
    /// current state's update, then poll acquisition. A target published by
    /// this tick's scan is acted on from the next tick.
    pub fn tick<S, P>(&mut self, ctx: &TickContext, scene: &S, spawner: &mut P) -> TickReport
    where
        S: SceneQuery + ?Sized,
        P: ProjectileSpawner + ?Sized,
    {
        let mut report = TickReport::default();
        let target = self.target;

        let transition = fsm::evaluate(self.state, target.is_some());
        if transition.changed {
            self.enter(transition.next, target, &mut report);
        }

        match (self.state, target) {
            (BehaviorState::Attack, Some(id)) => {
                self.update_attack(ctx, id, scene, spawner, &mut report)
            }
            _ => self.update_idle(ctx),
        }

        self.update_acquisition(ctx, scene, &mut report);
        report
    }

    /// Fire if the gate is open. Callable once per tick while attacking.
    pub fn request_shot<P>(&mut self, ctx: &TickContext, spawner: &mut P) -> Option<ProjectileHandle>
    where
        P: ProjectileSpawner + ?Sized,
    {
        fire::request_shot(
            &mut self.fire_gate,
            ctx.now,
            &self.config,
            &self.rig,
            ctx.position,
            spawner,
        )
    }

    /// Diagnostic overlay for a turret standing at `base`.
    pub fn diagnostics(&self, base: DVec3, now: f64) -> TurretDiagnostics {
        TurretDiagnostics {
            state: self.state,
            target: self.target,
            vision_radius: self.config.vision_radius,
            aim_point: self.targeting_position.map(Position::from),
            estimated_target_velocity: Velocity::from(self.kinematics.velocity()),
            head_forward: self.rig.head_forward(),
            gun_forward: self.rig.gun_forward(),
            gun_pivot: Position::from(self.rig.gun_pivot(base)),
            allow_fire: self.fire_gate.allow_fire(now),
        }
    }

    fn enter(&mut self, next: BehaviorState, target: Option<EntityId>, report: &mut TickReport) {
        self.state = next;
        match next {
            BehaviorState::Attack => {
                if let Some(id) = target {
                    log::debug!("turret engaging target {id}");
                    report.events.push(TurretEvent::Engaged { target: id });
                }
            }
            BehaviorState::Idle => {
                log::debug!("turret disengaged, returning to idle");
                self.kinematics.reset();
                report.events.push(TurretEvent::Disengaged);
            }
        }
    }

    fn update_idle(&mut self, ctx: &TickContext) {
        if self.config.idle_scan_rate > 0.0 {
            aim::idle_sweep(&mut self.rig, self.config.idle_scan_rate * ctx.dt);
        }
    }

    fn update_attack<S, P>(
        &mut self,
        ctx: &TickContext,
        id: EntityId,
        scene: &S,
        spawner: &mut P,
        report: &mut TickReport,
    ) where
        S: SceneQuery + ?Sized,
        P: ProjectileSpawner + ?Sized,
    {
        let Some(position) = scene.locate(id) else {
            // Gone since the last scan; the next scan releases it.
            self.kinematics.reset();
            return;
        };

        let velocity = self.kinematics.estimate(id, position, ctx.now);
        let pivot = self.rig.gun_pivot(ctx.position);
        let aim_point = self.lead.predict(position, velocity, pivot);
        self.targeting_position = Some(aim_point);

        let max_step = self.config.rotation_speed * ctx.dt;
        aim::aim_head(&mut self.rig, ctx.position, aim_point, max_step);
        aim::aim_gun(&mut self.rig, ctx.position, aim_point, max_step);

        if let Some(projectile) = self.request_shot(ctx, spawner) {
            log::trace!("turret fired {projectile} at {id}");
            report.shots.push(projectile);
            report.events.push(TurretEvent::ShotFired {
                projectile,
                target: id,
                aim_point: Position::from(aim_point),
            });
        }

        self.kinematics.record(id, position, ctx.now);
    }

    fn update_acquisition<S>(&mut self, ctx: &TickContext, scene: &S, report: &mut TickReport)
    where
        S: SceneQuery + ?Sized,
    {
        let found = match self
            .acquisition
            .poll(ctx.now, ctx.position, &self.config, scene)
        {
            Scan::NotDue => return,
            Scan::Completed(found) => found,
        };

        let previous = self.target;
        self.target = found.map(|candidate| candidate.id);

        match (previous, found) {
            (None, Some(candidate)) => {
                let range = ctx.position.distance(candidate.position);
                log::debug!("acquired target {} at {range:.1} m", candidate.id);
                report.events.push(TurretEvent::TargetAcquired {
                    target: candidate.id,
                    range,
                });
            }
            (Some(from), Some(candidate)) if from != candidate.id => {
                log::debug!("switched target {from} -> {}", candidate.id);
                report.events.push(TurretEvent::TargetSwitched {
                    from,
                    to: candidate.id,
                });
            }
            (Some(lost), None) => {
                log::debug!("lost target {lost}");
                report.events.push(TurretEvent::TargetLost { target: lost });
            }
            _ => {}
        }
    }
}
