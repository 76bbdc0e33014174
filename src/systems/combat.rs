use bevy::prelude::*;

use crate::components::*;
use crate::events::{EnemyDefeatedEvent, EnemyEscapedEvent, TurretFiredEvent};
use crate::resources::Score;

/// System that moves projectiles and despawns them when their timer runs out.
pub fn projectile_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Projectile, &mut ProjectileTimer)>,
) {
    for (entity, mut projectile, mut timer) in &mut query {
        let step = projectile.velocity * time.delta_secs();
        projectile.position += step;
        if timer.0.tick(time.delta()).finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// System to handle projectile hits on enemies.
/// A projectile damages the first live enemy it overlaps and is consumed.
pub fn projectile_hit_system(
    mut commands: Commands,
    projectiles: Query<(Entity, &Projectile)>,
    mut enemies: Query<&mut Enemy>,
) {
    for (projectile_entity, projectile) in &projectiles {
        for mut enemy in &mut enemies {
            if enemy.is_defeated() || !projectile.hits(enemy.position, Enemy::RADIUS) {
                continue;
            }
            enemy.take_damage(projectile.damage);
            commands.entity(projectile_entity).despawn_recursive();
            break;
        }
    }
}

/// Tallies enemy outcomes and shots for the HUD.
pub fn record_score(
    mut score: ResMut<Score>,
    mut defeated: EventReader<EnemyDefeatedEvent>,
    mut escaped: EventReader<EnemyEscapedEvent>,
    mut fired: EventReader<TurretFiredEvent>,
) {
    for _ in defeated.read() {
        score.defeated += 1;
    }
    for event in escaped.read() {
        info!("Enemy {:?} escaped", event.entity);
        score.escaped += 1;
    }
    for event in fired.read() {
        score.shots_fired += event.projectiles as u32;
    }
}
