//! Geometry helpers for marker quads and the image/world mapping.

use bevy::prelude::*;

/// Arithmetic mean of the four consecutive corner distances, wrapping from
/// the last corner back to the first.
pub fn mean_edge_length(corners: &[Vec2; 4]) -> f32 {
    let perimeter: f32 = (0..4)
        .map(|i| corners[i].distance(corners[(i + 1) % 4]))
        .sum();
    perimeter / 4.0
}

/// Returns true if `point` lies inside (or on the edge of) the convex quad.
///
/// Works for either winding: the point is inside when every edge cross
/// product has the same sign.
pub fn point_in_quad(point: Vec2, quad: &[Vec2; 4]) -> bool {
    let mut has_pos = false;
    let mut has_neg = false;

    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        let cross = (b - a).perp_dot(point - a);
        if cross > 0.0 {
            has_pos = true;
        } else if cross < 0.0 {
            has_neg = true;
        }
        if has_pos && has_neg {
            return false;
        }
    }

    true
}

/// Converts a point in image pixels (origin top-left, y down) to world
/// coordinates (origin at the frame center, y up).
pub fn image_to_world(point: Vec2, frame_size: Vec2) -> Vec2 {
    Vec2::new(point.x - frame_size.x / 2.0, frame_size.y / 2.0 - point.y)
}

/// Converts an image-space angle (y down) to a world-space angle (y up).
pub fn image_angle_to_world(angle: f32) -> f32 {
    -angle
}

/// Smallest absolute difference between two angles, in `[0, PI]`.
pub fn angle_between(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(std::f32::consts::TAU);
    diff.min(std::f32::consts::TAU - diff)
}
