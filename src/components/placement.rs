use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::marker::{Marker, MarkerId};

/// Firing behavior selected by a turret marker's ratio config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurretType {
    /// Rapid single shots.
    Gatling,
    /// Slow volleys fanned around the barrel.
    Spray,
}

/// What a placement stands for on the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum PlacementKind {
    Turret(TurretType),
    Wall,
    /// Play area anchor. Stored with the walls but never blocks enemies.
    Calibration,
}

/// A marker translated into game space for one sampling tick.
///
/// `angle` already has the type's rotation offset removed and `diameter`
/// is scaled from the marker's apparent size, so renderers and turret
/// objects can use both directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub id: MarkerId,
    pub corners: [Vec2; 4],
    pub center: Vec2,
    pub angle: f32,
    pub diameter: f32,
    pub kind: PlacementKind,
    /// Frame counter at the last successful observation.
    pub timestamp: u64,
}

impl Placement {
    /// Builds a placement from a debounced marker.
    ///
    /// `scale` is the configured diameter over the configured code width.
    pub fn from_marker(
        marker: &Marker,
        scale: f32,
        rotation_offset: f32,
        kind: PlacementKind,
        timestamp: u64,
    ) -> Self {
        Self {
            id: marker.id,
            corners: marker.corners,
            center: marker.center,
            angle: marker.angle - rotation_offset,
            diameter: scale * marker.edge_unit(),
            kind,
            timestamp,
        }
    }

    pub fn turret_type(&self) -> Option<TurretType> {
        match self.kind {
            PlacementKind::Turret(turret_type) => Some(turret_type),
            _ => None,
        }
    }

    /// Frames since this placement was last observed.
    pub fn age(&self, current_frame: u64) -> u64 {
        current_frame.saturating_sub(self.timestamp)
    }

    /// A placement stays alive while its age is below the grace period.
    pub fn is_fresh(&self, current_frame: u64, preserve_frames: u64) -> bool {
        self.age(current_frame) < preserve_frames
    }
}
