//! Sampling-tick systems: pull detector output and reconcile it into the
//! placement registries, the play area and the path grid.

use bevy::prelude::*;

use crate::components::{Marker, PlacementKind};
use crate::resources::*;

/// Reads the detector once and keeps the well-formed markers.
///
/// Malformed readings are logged and skipped for this tick only.
pub fn sample_markers(
    mut feed: ResMut<MarkerFeed>,
    mut frame: ResMut<MarkerFrame>,
) {
    let mut markers = Vec::new();
    for raw in feed.0.markers() {
        match Marker::try_from(raw) {
            Ok(marker) => markers.push(marker),
            Err(e) => warn!("Skipping marker: {}", e),
        }
    }

    frame.markers = markers;
}

/// Folds the sampled markers into the registry of one placement family.
pub fn sync_placements<R: PlacementRule>(
    clock: Res<FrameClock>,
    settings: Res<ArSettings>,
    frame: Res<MarkerFrame>,
    rule: Res<R>,
    mut cache: ResMut<MarkerCache>,
    mut registry: ResMut<PlacementRegistry<R>>,
) {
    let params = SyncParams {
        cache_hit_threshold: settings.cache_hit_threshold,
        preserve_frames: settings.preserve_frames,
    };
    let observed = registry.synchronize(&frame.markers, clock.frame, &*rule, &mut *cache, params);
    debug!(
        "Frame {}: {} {} markers observed, {} placements held",
        clock.frame,
        observed,
        R::FAMILY,
        registry.len()
    );
}

/// Forgets cached readings of markers that left the table.
pub fn evict_stale_markers(
    clock: Res<FrameClock>,
    settings: Res<ArSettings>,
    mut cache: ResMut<MarkerCache>,
) {
    if !settings.evict_stale_markers {
        return;
    }
    let evicted = cache.evict_stale(clock.frame, settings.preserve_frames);
    if evicted > 0 {
        debug!("Evicted {} stale marker readings", evicted);
    }
}

/// Recomputes the play area from the visible calibration anchors.
pub fn update_play_area(
    settings: Res<ArSettings>,
    walls: Res<WallRegistry>,
    mut area: ResMut<PlayArea>,
) {
    let anchors = walls
        .iter()
        .filter(|p| p.kind == PlacementKind::Calibration)
        .map(|p| p.center);
    let next = PlayArea::from_anchors(anchors, settings.frame_size());

    if *area != next {
        if next.calibrated != area.calibrated {
            info!(
                "Play area {}",
                if next.calibrated { "calibrated" } else { "lost calibration, using full frame" }
            );
        }
        *area = next;
    }
}

/// Re-lays the walkability grid so enemies route around the current walls.
pub fn sync_path_grid(
    settings: Res<ArSettings>,
    area: Res<PlayArea>,
    walls: Res<WallRegistry>,
    mut grid: ResMut<PathGrid>,
) {
    if grid.rebuild(&area, settings.grid_cell_size, walls.iter()) {
        debug!(
            "Path grid rebuilt: {}x{} cells, route of {} cells",
            grid.cols(),
            grid.rows(),
            grid.route().len()
        );
    }
}
