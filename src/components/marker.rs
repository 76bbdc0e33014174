//! Fiducial markers as reported by the external detector.
//!
//! The detector hands us `RawMarker`s with an arbitrary number of corners.
//! Everything downstream works on validated `Marker`s, which always have
//! exactly four finite corners.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::geometry::mean_edge_length;

/// Identifier printed on a fiducial tag.
pub type MarkerId = u32;

/// Detector output before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMarker {
    pub id: MarkerId,
    /// Corner points in image pixels, clockwise.
    pub corners: Vec<Vec2>,
    pub center: Vec2,
    /// Orientation in radians.
    pub angle: f32,
}

/// A validated marker reading for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    /// Clockwise corners in image pixels.
    pub corners: [Vec2; 4],
    pub center: Vec2,
    /// Orientation in radians.
    pub angle: f32,
}

impl Marker {
    pub fn new(id: MarkerId, corners: [Vec2; 4], center: Vec2, angle: f32) -> Self {
        Self { id, corners, center, angle }
    }

    /// Mean of the four corner-to-corner edge lengths, taken cyclically.
    /// Used as the scale reference when sizing placements.
    pub fn edge_unit(&self) -> f32 {
        mean_edge_length(&self.corners)
    }
}

/// Rejected detector output. Logged and skipped for the frame, never fatal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedMarkerError {
    #[error("marker {id} has {count} corners, expected 4")]
    CornerCount { id: MarkerId, count: usize },

    #[error("marker {id} has non-finite coordinates or angle")]
    NonFinite { id: MarkerId },
}

impl TryFrom<RawMarker> for Marker {
    type Error = MalformedMarkerError;

    fn try_from(raw: RawMarker) -> Result<Self, Self::Error> {
        let corners: [Vec2; 4] = raw
            .corners
            .as_slice()
            .try_into()
            .map_err(|_| MalformedMarkerError::CornerCount {
                id: raw.id,
                count: raw.corners.len(),
            })?;

        let finite = corners.iter().all(|c| c.is_finite())
            && raw.center.is_finite()
            && raw.angle.is_finite();
        if !finite {
            return Err(MalformedMarkerError::NonFinite { id: raw.id });
        }

        Ok(Marker::new(raw.id, corners, raw.center, raw.angle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_raw(id: MarkerId, corners: Vec<Vec2>) -> RawMarker {
        RawMarker {
            id,
            corners,
            center: Vec2::new(5.0, 5.0),
            angle: 0.0,
        }
    }

    #[test]
    fn test_valid_marker_converts() {
        let raw = square_raw(
            7,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, 10.0),
                Vec2::new(0.0, 10.0),
            ],
        );
        let marker = Marker::try_from(raw).unwrap();
        assert_eq!(marker.id, 7);
        assert_eq!(marker.corners[2], Vec2::new(10.0, 10.0));
        assert!((marker.edge_unit() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_wrong_corner_count_rejected() {
        let raw = square_raw(3, vec![Vec2::ZERO, Vec2::X, Vec2::Y]);
        assert_eq!(
            Marker::try_from(raw),
            Err(MalformedMarkerError::CornerCount { id: 3, count: 3 })
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let raw = square_raw(
            9,
            vec![Vec2::ZERO, Vec2::new(f32::NAN, 0.0), Vec2::ONE, Vec2::Y],
        );
        assert_eq!(
            Marker::try_from(raw),
            Err(MalformedMarkerError::NonFinite { id: 9 })
        );
    }

    #[test]
    fn test_raw_marker_json_shape() {
        let json = r#"{"id":40,"corners":[[0,0],[1,0],[1,1],[0,1]],"center":[0.5,0.5],"angle":0.25}"#;
        let raw: RawMarker = serde_json::from_str(json).unwrap();
        assert_eq!(raw.id, 40);
        assert_eq!(raw.corners.len(), 4);
        assert_eq!(raw.center, Vec2::new(0.5, 0.5));
    }
}
