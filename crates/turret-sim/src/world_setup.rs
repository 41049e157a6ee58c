//! Entity spawn factories for setting up the simulation world.

use std::f64::consts::TAU;

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use turret_control::Turret;
use turret_core::components::*;
use turret_core::constants::PROJECTILE_LIFETIME_SECS;
use turret_core::types::{Position, Velocity};

use crate::scene::PendingProjectile;

/// Spawn a turret emplacement at `position`.
pub fn spawn_turret(world: &mut World, position: Position, turret: Turret) -> hecs::Entity {
    world.spawn((TurretUnit, position, turret))
}

/// Spawn a tagged target moving at constant velocity.
pub fn spawn_target(
    world: &mut World,
    tag: impl Into<String>,
    position: Position,
    velocity: Velocity,
) -> hecs::Entity {
    world.spawn((Target, Tag(tag.into()), position, velocity))
}

/// Spawn `count` targets on a horizontal ring of `radius` around the origin,
/// each heading in a random direction at `speed`.
pub fn spawn_target_swarm(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    tag: &str,
    count: u32,
    radius: f64,
    speed: f64,
) -> Vec<hecs::Entity> {
    (0..count)
        .map(|_| {
            let bearing: f64 = rng.gen_range(0.0..TAU);
            let heading: f64 = rng.gen_range(0.0..TAU);
            let position = Position::new(radius * bearing.sin(), radius * bearing.cos(), 0.0);
            let velocity = Velocity::new(speed * heading.sin(), speed * heading.cos(), 0.0);
            spawn_target(world, tag, position, velocity)
        })
        .collect()
}

/// Fill in a projectile whose entity was reserved during the turret pass.
pub fn spawn_projectile(world: &mut World, pending: PendingProjectile) -> Result<(), hecs::NoSuchEntity> {
    let request = pending.request;
    world.insert(
        pending.entity,
        (
            Projectile {
                source: pending.source,
                speed: request.speed,
                remaining_secs: PROJECTILE_LIFETIME_SECS,
            },
            Position::from(request.position),
            Velocity::from(request.velocity()),
        ),
    )
}
