//! The world as seen by turrets: a read-only scene view and a projectile
//! spawner that defers insertion until the turret pass is over.

use glam::DVec3;
use hecs::{Entity, World};

use turret_control::{Candidate, ProjectileHandle, ProjectileSpawnRequest, ProjectileSpawner, SceneQuery};
use turret_core::components::{Tag, Target};
use turret_core::config::TagFilter;
use turret_core::types::{EntityId, Position};

/// Stable id of a hecs entity.
pub fn entity_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// hecs entity behind an id. Generation-checked by the world on use.
pub fn entity_of(id: EntityId) -> Option<Entity> {
    Entity::from_bits(id.0)
}

/// Tagged targets of a world.
pub struct WorldScene<'w> {
    world: &'w World,
}

impl<'w> WorldScene<'w> {
    pub fn new(world: &'w World) -> Self {
        Self { world }
    }
}

impl SceneQuery for WorldScene<'_> {
    fn candidates(&self, filter: &TagFilter) -> Vec<Candidate> {
        self.world
            .query::<(&Target, &Tag, &Position)>()
            .iter()
            .filter(|(_, (_, tag, _))| filter.matches(&tag.0))
            .map(|(entity, (_, _, pos))| Candidate {
                id: entity_id(entity),
                position: pos.to_vec3(),
            })
            .collect()
    }

    fn locate(&self, id: EntityId) -> Option<DVec3> {
        let entity = self.world.entity(entity_of(id)?).ok()?;
        if !entity.has::<Target>() {
            return None;
        }
        entity.get::<&Position>().map(|pos| pos.to_vec3())
    }
}

/// A spawn request waiting for its reserved entity to be filled in.
#[derive(Debug, Clone, Copy)]
pub struct PendingProjectile {
    pub entity: Entity,
    pub source: EntityId,
    pub request: ProjectileSpawnRequest,
}

/// Hands out reserved entity ids so turrets get a handle immediately.
pub struct ProjectileQueue<'w> {
    world: &'w World,
    source: EntityId,
    pending: Vec<PendingProjectile>,
}

impl<'w> ProjectileQueue<'w> {
    pub fn new(world: &'w World) -> Self {
        Self {
            world,
            source: EntityId(0),
            pending: Vec::new(),
        }
    }

    /// Attribute subsequent spawns to `turret`.
    pub fn set_source(&mut self, turret: EntityId) {
        self.source = turret;
    }

    pub fn into_pending(self) -> Vec<PendingProjectile> {
        self.pending
    }
}

impl ProjectileSpawner for ProjectileQueue<'_> {
    fn spawn(&mut self, request: ProjectileSpawnRequest) -> ProjectileHandle {
        let entity = self.world.reserve_entity();
        self.pending.push(PendingProjectile {
            entity,
            source: self.source,
            request,
        });
        entity_id(entity)
    }
}
