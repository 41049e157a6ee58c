//! Turret control system: ticks every turret against a read-only view of
//! the world, then materializes the projectiles they requested.

use hecs::World;

use turret_control::{TickContext, Turret};
use turret_core::components::TurretUnit;
use turret_core::events::TurretEventRecord;
use turret_core::types::Position;

use crate::scene::{entity_id, ProjectileQueue, WorldScene};
use crate::world_setup;

/// Run one control tick for every turret.
pub fn run(
    world: &mut World,
    now: f64,
    dt: f64,
    tick: u64,
    events: &mut Vec<TurretEventRecord>,
) {
    let turrets: Vec<(hecs::Entity, Position)> = world
        .query::<(&TurretUnit, &Position)>()
        .iter()
        .map(|(entity, (_, pos))| (entity, *pos))
        .collect();

    let pending = {
        let world: &World = world;
        let scene = WorldScene::new(world);
        let mut spawner = ProjectileQueue::new(world);

        for (entity, position) in turrets {
            let Ok(mut turret) = world.get::<&mut Turret>(entity) else {
                continue;
            };
            let id = entity_id(entity);
            spawner.set_source(id);

            let ctx = TickContext {
                now,
                dt,
                position: position.to_vec3(),
            };
            let report = turret.tick(&ctx, &scene, &mut spawner);
            events.extend(report.events.into_iter().map(|event| TurretEventRecord {
                turret: id,
                tick,
                event,
            }));
        }

        spawner.into_pending()
    };

    for projectile in pending {
        if let Err(err) = world_setup::spawn_projectile(world, projectile) {
            log::warn!("dropping projectile {}: {err}", entity_id(projectile.entity));
        }
    }
}
