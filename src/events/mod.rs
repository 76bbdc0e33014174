use bevy::prelude::*;

use crate::components::MarkerId;

/// Event emitted when an enemy's health reaches zero.
#[derive(Event, Debug)]
pub struct EnemyDefeatedEvent {
    pub entity: Entity,
}

/// Event emitted when an enemy reaches the exit of the play area.
#[derive(Event, Debug)]
pub struct EnemyEscapedEvent {
    pub entity: Entity,
}

/// Event emitted each time a turret fires a volley.
#[derive(Event, Debug)]
pub struct TurretFiredEvent {
    pub turret: MarkerId,
    pub projectiles: usize,
}
