use bevy::prelude::*;
use std::collections::HashMap;

use crate::components::MarkerId;

/// Turret entities keyed by the marker id that spawned them.
///
/// An entry is created the first time a turret placement is seen. Removal
/// only happens through `despawn_lost_turrets` when that is enabled, which
/// it is not by default.
#[derive(Resource, Debug, Default)]
pub struct ActiveTurrets {
    turrets: HashMap<MarkerId, Entity>,
}

impl ActiveTurrets {
    pub fn get(&self, id: MarkerId) -> Option<Entity> {
        self.turrets.get(&id).copied()
    }

    pub fn insert(&mut self, id: MarkerId, entity: Entity) {
        self.turrets.insert(id, entity);
    }

    pub fn remove(&mut self, id: MarkerId) -> Option<Entity> {
        self.turrets.remove(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.turrets.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.turrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turrets.is_empty()
    }
}
