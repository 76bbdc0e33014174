use bevy::prelude::*;

use crate::plugins::core::FrameSet;
use crate::resources::*;
use crate::systems::{
    despawn_lost_turrets, evict_stale_markers, sample_markers, sync_path_grid, sync_placements,
    sync_turret_objects, update_play_area,
};

/// Plugin that turns detector output into turret and wall placements.
///
/// Everything here runs on sampling ticks only, in `FrameSet::Sample`.
pub struct MarkerSyncPlugin;

impl Plugin for MarkerSyncPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArSettings>().init_resource::<RatioTable>();

        let settings = app.world().resource::<ArSettings>().clone();
        let wall_rule = WallRule::new(
            app.world().resource::<RatioTable>(),
            settings.calibration_ids.iter().copied(),
        );

        app.insert_resource(wall_rule)
            .insert_resource(PlayArea::full_frame(settings.frame_size()))
            .init_resource::<MarkerCache>()
            .init_resource::<MarkerFrame>()
            .init_resource::<TurretRegistry>()
            .init_resource::<WallRegistry>()
            .init_resource::<PathGrid>()
            .init_resource::<ActiveTurrets>()
            .add_systems(
                FixedUpdate,
                (
                    sample_markers,
                    sync_placements::<RatioTable>,
                    sync_placements::<WallRule>,
                    evict_stale_markers,
                    update_play_area,
                    sync_path_grid,
                    sync_turret_objects,
                    despawn_lost_turrets,
                )
                    .chain()
                    .in_set(FrameSet::Sample),
            );
    }
}
