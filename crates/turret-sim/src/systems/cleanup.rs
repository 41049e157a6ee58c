//! Cleanup system: removes expired projectiles and anything that left the world.

use hecs::{Entity, World};

use turret_core::components::{Projectile, Target};
use turret_core::constants::WORLD_RADIUS;
use turret_core::types::Position;

/// Age projectiles by `dt` and despawn the expired ones, then despawn targets
/// and projectiles beyond WORLD_RADIUS from the origin.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, dt: f64, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    let radius_sq = WORLD_RADIUS * WORLD_RADIUS;

    for (entity, (projectile, pos)) in world.query_mut::<(&mut Projectile, &Position)>() {
        projectile.remaining_secs -= dt;
        if projectile.remaining_secs <= 0.0 || range_sq(pos) > radius_sq {
            despawn_buffer.push(entity);
        }
    }

    for (entity, (pos, _target)) in world.query_mut::<(&Position, &Target)>() {
        if range_sq(pos) > radius_sq {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

fn range_sq(pos: &Position) -> f64 {
    pos.x * pos.x + pos.y * pos.y + pos.z * pos.z
}
