use bevy::prelude::*;

use crate::components::*;
use crate::plugins::core::GameState;
use crate::resources::*;
use crate::utils::geometry::{image_angle_to_world, image_to_world};

/// Gizmo overlay drawn on top of the camera feed.
///
/// Everything is stored in image pixels; drawing converts to world space
/// with the frame centered on the camera.
pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::NONE))
            .add_systems(Update, update_backdrop)
            .add_systems(
                Update,
                (
                    draw_play_area,
                    draw_walls,
                    draw_turrets,
                    draw_enemies,
                    draw_projectiles,
                    draw_debug_grid,
                    draw_raw_markers,
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

const WALL_COLOR: Color = Color::srgb(0.85, 0.35, 0.2);
const TURRET_COLOR: Color = Color::srgb(0.2, 0.7, 0.9);
const ENEMY_COLOR: Color = Color::srgb(0.9, 0.2, 0.3);
const PROJECTILE_COLOR: Color = Color::srgb(1.0, 0.9, 0.3);
const DEBUG_COLOR: Color = Color::srgba(0.6, 0.6, 0.6, 0.4);

/// Clears to transparent while the video feed shows through, white otherwise.
fn update_backdrop(settings: Res<ArSettings>, mut clear_color: ResMut<ClearColor>) {
    if !settings.is_changed() {
        return;
    }
    clear_color.0 = if settings.show_video_feed {
        Color::NONE
    } else {
        Color::WHITE
    };
}

fn draw_quad(gizmos: &mut Gizmos, corners: &[Vec2; 4], frame_size: Vec2, color: Color) {
    let points = corners
        .iter()
        .chain(corners.first())
        .map(|corner| image_to_world(*corner, frame_size));
    gizmos.linestrip_2d(points, color);
}

fn draw_play_area(mut gizmos: Gizmos, settings: Res<ArSettings>, area: Res<PlayArea>) {
    let frame_size = settings.frame_size();
    let center = image_to_world(area.bounds.center(), frame_size);
    let color = if area.calibrated {
        Color::srgb(0.3, 0.9, 0.4)
    } else {
        DEBUG_COLOR
    };
    gizmos.rect_2d(Isometry2d::from_translation(center), area.bounds.size(), color);
}

fn draw_walls(mut gizmos: Gizmos, settings: Res<ArSettings>, walls: Res<WallRegistry>) {
    let frame_size = settings.frame_size();
    for placement in walls.iter() {
        match placement.kind {
            PlacementKind::Wall => draw_quad(&mut gizmos, &placement.corners, frame_size, WALL_COLOR),
            PlacementKind::Calibration if settings.debug => {
                draw_quad(&mut gizmos, &placement.corners, frame_size, DEBUG_COLOR)
            }
            _ => {}
        }
    }
}

/// World-space outline of one turret: body circle plus barrel.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TurretBody {
    center: Vec2,
    radius: f32,
    barrel_end: Vec2,
}

/// Turret bodies come from the placement registry, so a turret whose
/// marker left the table disappears once its placement expires.
fn turret_bodies(registry: &TurretRegistry, frame_size: Vec2) -> Vec<TurretBody> {
    registry
        .iter()
        .map(|placement| {
            let center = image_to_world(placement.center, frame_size);
            let heading = Vec2::from_angle(image_angle_to_world(placement.angle));
            TurretBody {
                center,
                radius: placement.diameter / 2.0,
                barrel_end: center + heading * placement.diameter * 0.75,
            }
        })
        .collect()
}

fn draw_turrets(
    mut gizmos: Gizmos,
    settings: Res<ArSettings>,
    registry: Res<TurretRegistry>,
    turrets: Query<&Turret>,
) {
    let frame_size = settings.frame_size();
    for body in turret_bodies(&registry, frame_size) {
        gizmos.circle_2d(Isometry2d::from_translation(body.center), body.radius, TURRET_COLOR);
        gizmos.line_2d(body.center, body.barrel_end, TURRET_COLOR);
    }

    if settings.debug {
        for turret in &turrets {
            let center = image_to_world(turret.position, frame_size);
            gizmos.circle_2d(Isometry2d::from_translation(center), turret.range(), DEBUG_COLOR);
        }
    }
}

fn draw_enemies(mut gizmos: Gizmos, settings: Res<ArSettings>, enemies: Query<&Enemy>) {
    let frame_size = settings.frame_size();
    for enemy in &enemies {
        let center = image_to_world(enemy.position, frame_size);
        gizmos.circle_2d(Isometry2d::from_translation(center), Enemy::RADIUS, ENEMY_COLOR);

        // Health bar above the enemy
        let left = center + Vec2::new(-Enemy::RADIUS, Enemy::RADIUS + 4.0);
        let width = Enemy::RADIUS * 2.0 * enemy.health_ratio();
        gizmos.line_2d(left, left + Vec2::X * width, ENEMY_COLOR);
    }
}

fn draw_projectiles(mut gizmos: Gizmos, settings: Res<ArSettings>, projectiles: Query<&Projectile>) {
    let frame_size = settings.frame_size();
    for projectile in &projectiles {
        let center = image_to_world(projectile.position, frame_size);
        gizmos.circle_2d(Isometry2d::from_translation(center), Projectile::RADIUS, PROJECTILE_COLOR);
    }
}

fn draw_debug_grid(mut gizmos: Gizmos, settings: Res<ArSettings>, grid: Res<PathGrid>) {
    if !settings.debug || grid.cols() == 0 {
        return;
    }
    let frame_size = settings.frame_size();
    let cell = Vec2::splat(grid.cell_size());

    for y in 0..grid.rows() {
        for x in 0..grid.cols() {
            let coord = IVec2::new(x, y);
            if grid.is_blocked(coord) {
                let center = image_to_world(grid.cell_center(coord), frame_size);
                gizmos.rect_2d(Isometry2d::from_translation(center), cell, WALL_COLOR);
            }
        }
    }

    let route = grid
        .route()
        .iter()
        .map(|coord| image_to_world(grid.cell_center(*coord), frame_size));
    gizmos.linestrip_2d(route, DEBUG_COLOR);
}

/// Outlines every marker from the latest sample, before any filtering.
fn draw_raw_markers(mut gizmos: Gizmos, settings: Res<ArSettings>, frame: Res<MarkerFrame>) {
    if !settings.debug {
        return;
    }
    let frame_size = settings.frame_size();
    for marker in &frame.markers {
        draw_quad(&mut gizmos, &marker.corners, frame_size, Color::srgb(1.0, 0.0, 1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Vec2 = Vec2::new(640.0, 480.0);

    fn synced_registry(frame: u64) -> TurretRegistry {
        let marker = Marker::try_from(square_marker(40, Vec2::new(320.0, 240.0), 10.0, 0.0)).unwrap();
        let params = SyncParams {
            cache_hit_threshold: 2.0,
            preserve_frames: 5,
        };
        let mut registry = TurretRegistry::new();
        registry.synchronize(&[marker], frame, &RatioTable::default(), &mut MarkerCache::new(), params);
        registry
    }

    #[test]
    fn test_turret_body_follows_placement() {
        let registry = synced_registry(1);
        let bodies = turret_bodies(&registry, FRAME);

        assert_eq!(bodies.len(), 1);
        let body = bodies[0];
        // Frame center maps to the world origin; diameter 16 from a 10px code
        assert!(body.center.length() < 1e-4);
        assert!((body.radius - 8.0).abs() < 1e-4);
        // Placement angle -pi/2 in image space points up the screen
        assert!((body.barrel_end - Vec2::new(0.0, 12.0)).length() < 1e-3);
    }

    #[test]
    fn test_expired_turret_is_not_drawn() {
        let mut registry = synced_registry(1);
        registry.prune(6, 5);
        assert!(turret_bodies(&registry, FRAME).is_empty());
    }
}
