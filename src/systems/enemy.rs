use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use crate::components::Enemy;
use crate::events::{EnemyDefeatedEvent, EnemyEscapedEvent};
use crate::resources::{ArSettings, PathGrid};

/// Repeating timer for enemy waves.
#[derive(Resource, Debug)]
pub struct EnemySpawner {
    pub timer: Timer,
}

impl EnemySpawner {
    pub fn new(interval_secs: f32) -> Self {
        Self {
            timer: Timer::new(
                Duration::from_secs_f32(interval_secs.max(0.1)),
                TimerMode::Repeating,
            ),
        }
    }
}

impl FromWorld for EnemySpawner {
    fn from_world(world: &mut World) -> Self {
        let interval = world
            .get_resource::<ArSettings>()
            .map(|s| s.enemy_spawn_interval)
            .unwrap_or(ArSettings::default().enemy_spawn_interval);
        Self::new(interval)
    }
}

/// Spawns an enemy at the route entry each time the spawner fires.
pub fn spawn_enemies(
    mut commands: Commands,
    time: Res<Time>,
    mut spawner: ResMut<EnemySpawner>,
    grid: Res<PathGrid>,
) {
    if !spawner.timer.tick(time.delta()).just_finished() {
        return;
    }
    if grid.cols() == 0 {
        return;
    }

    // Spread enemies across the entry cell so they don't stack
    let jitter = rand::thread_rng().gen_range(-0.3..0.3) * grid.cell_size();
    let entry = grid.cell_center(grid.start()) + Vec2::new(0.0, jitter);
    let waypoints = grid.waypoints_from(entry);

    commands.spawn((Name::new("Enemy"), Enemy::new(entry, waypoints, grid.version())));
}

/// Re-plans enemies whose route predates the latest wall layout.
pub fn repath_enemies(grid: Res<PathGrid>, mut enemies: Query<&mut Enemy>) {
    for mut enemy in &mut enemies {
        if enemy.route_version != grid.version() {
            let waypoints = grid.waypoints_from(enemy.position);
            enemy.replan(waypoints, grid.version());
        }
    }
}

/// Walks enemies along their waypoints; enemies reaching the exit escape.
pub fn move_enemies(
    mut commands: Commands,
    time: Res<Time>,
    mut enemies: Query<(Entity, &mut Enemy)>,
    mut escaped: EventWriter<EnemyEscapedEvent>,
) {
    let dt = time.delta_secs();
    for (entity, mut enemy) in &mut enemies {
        if enemy.advance(dt) {
            escaped.send(EnemyEscapedEvent { entity });
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Despawns enemies whose health is gone.
pub fn enemy_defeat_system(
    mut commands: Commands,
    enemies: Query<(Entity, &Enemy)>,
    mut defeated: EventWriter<EnemyDefeatedEvent>,
) {
    for (entity, enemy) in &enemies {
        if enemy.is_defeated() {
            defeated.send(EnemyDefeatedEvent { entity });
            commands.entity(entity).despawn_recursive();
        }
    }
}
