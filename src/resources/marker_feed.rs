//! Bridge to the external marker detector.
//!
//! The camera pipeline and fiducial detection live outside this crate; they
//! plug in by implementing `MarkerSource`. Two sources ship here: a replay of
//! recorded frames and a fixed demo layout.

use std::path::Path;

use bevy::prelude::*;

use crate::components::{Marker, MarkerId, RawMarker};
use crate::resources::settings::{read_json, SettingsError};

/// Produces the detector's marker set once per sampled frame.
pub trait MarkerSource: Send + Sync + 'static {
    /// Current detector output. Called once per sampling tick.
    fn markers(&mut self) -> Vec<RawMarker>;

    /// False while the camera or detector is still warming up.
    fn is_ready(&self) -> bool;
}

/// The active marker source.
#[derive(Resource)]
pub struct MarkerFeed(pub Box<dyn MarkerSource>);

impl MarkerFeed {
    pub fn new(source: impl MarkerSource) -> Self {
        Self(Box::new(source))
    }
}

/// Validated markers from the latest sampling tick.
#[derive(Resource, Debug, Default, Clone)]
pub struct MarkerFrame {
    pub markers: Vec<Marker>,
}

/// Loops over a recorded sequence of detector frames.
#[derive(Debug, Clone, Default)]
pub struct ReplayMarkerSource {
    frames: Vec<Vec<RawMarker>>,
    cursor: usize,
}

impl ReplayMarkerSource {
    pub fn new(frames: Vec<Vec<RawMarker>>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Loads a JSON array of frames, each an array of raw markers.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let frames: Vec<Vec<RawMarker>> = read_json(path)?;
        info!("Loaded {} replay frames from {:?}", frames.len(), path);
        Ok(Self::new(frames))
    }
}

impl MarkerSource for ReplayMarkerSource {
    fn markers(&mut self) -> Vec<RawMarker> {
        if self.frames.is_empty() {
            return Vec::new();
        }
        let frame = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        frame
    }

    fn is_ready(&self) -> bool {
        !self.frames.is_empty()
    }
}

/// Reports the same markers every frame.
#[derive(Debug, Clone, Default)]
pub struct StaticMarkerSource {
    pub markers: Vec<RawMarker>,
}

impl StaticMarkerSource {
    pub fn new(markers: Vec<RawMarker>) -> Self {
        Self { markers }
    }

    /// Four calibration anchors, a wall across the middle and one turret of
    /// each type, laid out on a 640x480 frame.
    pub fn demo_layout() -> Self {
        let anchors = [
            (0, Vec2::new(40.0, 40.0)),
            (1, Vec2::new(600.0, 40.0)),
            (2, Vec2::new(600.0, 440.0)),
            (3, Vec2::new(40.0, 440.0)),
        ];
        let mut markers: Vec<RawMarker> = anchors
            .into_iter()
            .map(|(id, center)| square_marker(id, center, 30.0, 0.0))
            .collect();

        markers.push(square_marker(12, Vec2::new(320.0, 200.0), 60.0, 0.0));
        markers.push(square_marker(40, Vec2::new(220.0, 320.0), 30.0, 0.0));
        markers.push(square_marker(50, Vec2::new(420.0, 140.0), 30.0, std::f32::consts::PI));

        Self::new(markers)
    }
}

impl MarkerSource for StaticMarkerSource {
    fn markers(&mut self) -> Vec<RawMarker> {
        self.markers.clone()
    }

    fn is_ready(&self) -> bool {
        true
    }
}

/// Axis-aligned square marker centered on `center`, corners clockwise in
/// image space.
pub fn square_marker(id: MarkerId, center: Vec2, side: f32, angle: f32) -> RawMarker {
    let h = side / 2.0;
    RawMarker {
        id,
        corners: vec![
            center + Vec2::new(-h, -h),
            center + Vec2::new(h, -h),
            center + Vec2::new(h, h),
            center + Vec2::new(-h, h),
        ],
        center,
        angle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_loops() {
        let mut source = ReplayMarkerSource::new(vec![
            vec![square_marker(1, Vec2::ZERO, 10.0, 0.0)],
            vec![],
        ]);
        assert!(source.is_ready());
        assert_eq!(source.markers().len(), 1);
        assert!(source.markers().is_empty());
        assert_eq!(source.markers().len(), 1);
    }

    #[test]
    fn test_empty_replay_not_ready() {
        let mut source = ReplayMarkerSource::default();
        assert!(!source.is_ready());
        assert!(source.markers().is_empty());
    }

    #[test]
    fn test_replay_from_file() {
        let path = std::env::temp_dir().join("ar_td_replay_test.json");
        let frames = vec![vec![square_marker(40, Vec2::new(5.0, 5.0), 10.0, 0.0)]];
        std::fs::write(&path, serde_json::to_string(&frames).unwrap()).unwrap();

        let mut source = ReplayMarkerSource::from_file(&path).unwrap();
        assert_eq!(source.markers(), frames[0]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_demo_layout_is_well_formed() {
        let mut source = StaticMarkerSource::demo_layout();
        for raw in source.markers() {
            assert!(Marker::try_from(raw).is_ok());
        }
    }
}
