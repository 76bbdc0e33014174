use bevy::prelude::*;

/// The playfield in image pixels.
///
/// Spanned by the calibration anchors when at least two are visible,
/// otherwise the whole detector frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub bounds: Rect,
    /// True when the bounds come from calibration markers.
    pub calibrated: bool,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self::full_frame(Vec2::new(640.0, 480.0))
    }
}

impl PlayArea {
    pub fn full_frame(frame_size: Vec2) -> Self {
        Self {
            bounds: Rect::from_corners(Vec2::ZERO, frame_size),
            calibrated: false,
        }
    }

    /// Bounding box of the anchor centers.
    ///
    /// Falls back to the full frame with fewer than two anchors or when the
    /// anchors are collinear along an axis.
    pub fn from_anchors(anchors: impl IntoIterator<Item = Vec2>, frame_size: Vec2) -> Self {
        let mut count = 0;
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for point in anchors {
            min = min.min(point);
            max = max.max(point);
            count += 1;
        }

        let size = max - min;
        if count < 2 || size.x <= 0.0 || size.y <= 0.0 {
            return Self::full_frame(frame_size);
        }

        Self {
            bounds: Rect::from_corners(min, max),
            calibrated: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Vec2 = Vec2::new(640.0, 480.0);

    #[test]
    fn test_no_anchors_uses_full_frame() {
        let area = PlayArea::from_anchors([], FRAME);
        assert!(!area.calibrated);
        assert_eq!(area.bounds.max, FRAME);
    }

    #[test]
    fn test_single_anchor_uses_full_frame() {
        let area = PlayArea::from_anchors([Vec2::new(10.0, 10.0)], FRAME);
        assert!(!area.calibrated);
    }

    #[test]
    fn test_anchor_bounds() {
        let area = PlayArea::from_anchors(
            [Vec2::new(40.0, 50.0), Vec2::new(600.0, 60.0), Vec2::new(100.0, 440.0)],
            FRAME,
        );
        assert!(area.calibrated);
        assert_eq!(area.bounds.min, Vec2::new(40.0, 50.0));
        assert_eq!(area.bounds.max, Vec2::new(600.0, 440.0));
    }

    #[test]
    fn test_collinear_anchors_fall_back() {
        let area = PlayArea::from_anchors([Vec2::new(40.0, 50.0), Vec2::new(600.0, 50.0)], FRAME);
        assert!(!area.calibrated);
    }
}
