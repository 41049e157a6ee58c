//! Snapshot system: queries the ECS world and builds a complete SimSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use turret_control::Turret;
use turret_core::components::*;
use turret_core::events::TurretEventRecord;
use turret_core::state::*;
use turret_core::types::{Position, SimTime, Velocity};

use crate::scene::entity_id;

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    paused: bool,
    events: Vec<TurretEventRecord>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        paused,
        turrets: build_turrets(world, time.elapsed_secs),
        targets: build_targets(world),
        projectiles: build_projectiles(world),
        events,
    }
}

/// Build TurretView list with each turret's diagnostic overlay.
fn build_turrets(world: &World, now: f64) -> Vec<TurretView> {
    let mut turrets: Vec<TurretView> = world
        .query::<(&TurretUnit, &Position, &Turret)>()
        .iter()
        .map(|(entity, (_, pos, turret))| TurretView {
            id: entity_id(entity),
            position: *pos,
            diagnostics: turret.diagnostics(pos.to_vec3(), now),
        })
        .collect();
    turrets.sort_by_key(|view| view.id);
    turrets
}

fn build_targets(world: &World) -> Vec<TargetView> {
    let mut targets: Vec<TargetView> = world
        .query::<(&Target, &Tag, &Position, &Velocity)>()
        .iter()
        .map(|(entity, (_, tag, pos, vel))| TargetView {
            id: entity_id(entity),
            tag: tag.0.clone(),
            position: *pos,
            velocity: *vel,
        })
        .collect();
    targets.sort_by_key(|view| view.id);
    targets
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Projectile, &Position, &Velocity)>()
        .iter()
        .map(|(entity, (projectile, pos, vel))| ProjectileView {
            id: entity_id(entity),
            source: projectile.source,
            position: *pos,
            velocity: *vel,
            remaining_secs: projectile.remaining_secs,
        })
        .collect();
    projectiles.sort_by_key(|view| view.id);
    projectiles
}
