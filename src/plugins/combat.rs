use bevy::prelude::*;

use crate::events::{EnemyDefeatedEvent, EnemyEscapedEvent, TurretFiredEvent};
use crate::plugins::core::FrameSet;
use crate::resources::Score;
use crate::systems::*;

/// Plugin that runs enemies, turret objects and projectiles every tick.
///
/// Reads the placement state produced by `MarkerSyncPlugin` without
/// waiting on it; a tick simply sees the latest completed sample.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemyDefeatedEvent>()
            .add_event::<EnemyEscapedEvent>()
            .add_event::<TurretFiredEvent>()
            .init_resource::<Score>()
            .init_resource::<EnemySpawner>()
            .add_systems(
                FixedUpdate,
                (
                    spawn_enemies,
                    repath_enemies,
                    move_enemies,
                    acquire_targets,
                    update_turret_objects,
                    projectile_system,
                    projectile_hit_system,
                    enemy_defeat_system,
                    record_score,
                )
                    .chain()
                    .in_set(FrameSet::Simulate),
            );
    }
}
