use bevy::prelude::*;

use crate::components::*;
use crate::events::TurretFiredEvent;
use crate::resources::{ActiveTurrets, ArSettings, TurretRegistry};
use crate::utils::geometry::angle_between;

/// Spawns a turret object the first time its id shows up in the registry and
/// refreshes existing ones from their latest placement.
pub fn sync_turret_objects(
    mut commands: Commands,
    registry: Res<TurretRegistry>,
    mut active: ResMut<ActiveTurrets>,
    mut turrets: Query<&mut Turret>,
) {
    for placement in registry.iter() {
        if let Some(entity) = active.get(placement.id) {
            if let Ok(mut turret) = turrets.get_mut(entity) {
                turret.update_from_placement(placement);
            }
            continue;
        }

        let Some(turret) = Turret::from_placement(placement) else {
            continue;
        };
        info!(
            "Turret {} placed ({:?}) at ({:.0}, {:.0})",
            placement.id,
            turret.behavior.turret_type(),
            placement.center.x,
            placement.center.y
        );
        let entity = commands
            .spawn((Name::new(format!("Turret {}", placement.id)), turret))
            .id();
        active.insert(placement.id, entity);
    }
}

/// Tears down turrets whose placement has expired from the registry.
pub fn despawn_lost_turrets(
    mut commands: Commands,
    settings: Res<ArSettings>,
    registry: Res<TurretRegistry>,
    mut active: ResMut<ActiveTurrets>,
) {
    if !settings.despawn_lost_turrets {
        return;
    }

    let lost: Vec<MarkerId> = active.ids().filter(|id| !registry.contains(*id)).collect();
    for id in lost {
        if let Some(entity) = active.remove(id) {
            info!("Turret {} removed", id);
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Picks the closest enemy in range and inside each turret's firing arc.
pub fn acquire_targets(mut turrets: Query<&mut Turret>, enemies: Query<(Entity, &Enemy)>) {
    for mut turret in &mut turrets {
        let position = turret.position;
        let heading = turret.angle;
        let range = turret.range();
        let arc = turret.behavior.firing_arc();

        let target = enemies
            .iter()
            .filter(|(_, enemy)| !enemy.is_defeated())
            .map(|(entity, enemy)| (entity, enemy.position - position))
            .filter(|(_, offset)| offset.length() <= range)
            .filter(|(_, offset)| angle_between(offset.to_angle(), heading) <= arc)
            .min_by(|(_, a), (_, b)| a.length_squared().total_cmp(&b.length_squared()))
            .map(|(entity, _)| entity);

        if turret.target != target {
            turret.target = target;
        }
    }
}

/// Ticks every turret and spawns the projectiles of any volley it fires.
///
/// Runs every simulation tick, whether or not the turret's marker is
/// currently visible.
pub fn update_turret_objects(
    mut commands: Commands,
    time: Res<Time>,
    mut turrets: Query<&mut Turret>,
    mut fired: EventWriter<TurretFiredEvent>,
) {
    let dt = time.delta_secs();
    for mut turret in &mut turrets {
        let angle = turret.angle;
        let Some(volley) = turret.update(angle, dt) else {
            continue;
        };

        for direction in &volley.directions {
            commands.spawn((
                Projectile::new(volley.origin, *direction, volley.damage),
                ProjectileTimer::default(),
            ));
        }
        fired.send(TurretFiredEvent {
            turret: turret.id,
            projectiles: volley.directions.len(),
        });
    }
}
