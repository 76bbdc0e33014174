//! Jitter suppression for detector readings.
//!
//! The detector wobbles by a pixel or two every frame even when a tag is
//! resting on the table. The cache latches the last accepted reading per
//! marker id and keeps returning it until a new reading moves further than
//! the configured threshold.

use bevy::prelude::*;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::components::{Marker, MarkerId};

#[derive(Debug, Clone, Copy)]
struct CachedMarker {
    marker: Marker,
    /// Frame of the latest reading, accepted or not.
    last_seen: u64,
}

/// Last accepted reading for every marker id seen so far.
#[derive(Resource, Default, Debug)]
pub struct MarkerCache {
    entries: HashMap<MarkerId, CachedMarker>,
}

impl MarkerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the marker to use for this frame.
    ///
    /// A new reading replaces the cached one only if its center moved more
    /// than `threshold` pixels or its angle changed by more than `threshold`
    /// radians. Otherwise the cached reading is returned untouched.
    pub fn check(&mut self, marker: Marker, threshold: f32, frame: u64) -> Marker {
        let cached = match self.entries.entry(marker.id) {
            Entry::Vacant(slot) => {
                slot.insert(CachedMarker { marker, last_seen: frame });
                return marker;
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        cached.last_seen = frame;

        let moved = cached.marker.center.distance(marker.center) > threshold;
        let turned = (cached.marker.angle - marker.angle).abs() > threshold;
        if moved || turned {
            cached.marker = marker;
        }

        cached.marker
    }

    /// Cached reading for an id, if any.
    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.entries.get(&id).map(|c| &c.marker)
    }

    /// Drops readings for markers unseen for `preserve_frames` frames.
    /// Returns how many entries were removed.
    pub fn evict_stale(&mut self, current_frame: u64, preserve_frames: u64) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, c| current_frame.saturating_sub(c.last_seen) < preserve_frames);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_at(id: MarkerId, center: Vec2, angle: f32) -> Marker {
        let h = Vec2::splat(5.0);
        Marker::new(
            id,
            [
                center - h,
                center + Vec2::new(h.x, -h.y),
                center + h,
                center + Vec2::new(-h.x, h.y),
            ],
            center,
            angle,
        )
    }

    #[test]
    fn test_first_reading_is_stored() {
        let mut cache = MarkerCache::new();
        let m = marker_at(1, Vec2::new(10.0, 10.0), 0.0);
        assert_eq!(cache.check(m, 2.0, 0), m);
        assert_eq!(cache.get(1), Some(&m));
    }

    #[test]
    fn test_jitter_returns_cached_reading() {
        let mut cache = MarkerCache::new();
        let first = marker_at(1, Vec2::new(10.0, 10.0), 0.5);
        let jitter = marker_at(1, Vec2::new(11.0, 10.5), 0.6);

        assert_eq!(cache.check(first, 2.0, 0), first);
        assert_eq!(cache.check(jitter, 2.0, 1), first);
        // Repeated jitter keeps returning the latched reading
        assert_eq!(cache.check(jitter, 2.0, 2), first);
        assert_eq!(cache.get(1), Some(&first));
    }

    #[test]
    fn test_delta_equal_to_threshold_is_jitter() {
        let mut cache = MarkerCache::new();
        let first = marker_at(1, Vec2::new(0.0, 0.0), 0.0);
        let edge = marker_at(1, Vec2::new(2.0, 0.0), 0.0);
        cache.check(first, 2.0, 0);
        assert_eq!(cache.check(edge, 2.0, 1), first);
    }

    #[test]
    fn test_large_move_replaces_cache() {
        let mut cache = MarkerCache::new();
        let first = marker_at(1, Vec2::new(10.0, 10.0), 0.0);
        let moved = marker_at(1, Vec2::new(30.0, 10.0), 0.0);
        cache.check(first, 2.0, 0);
        assert_eq!(cache.check(moved, 2.0, 1), moved);
        assert_eq!(cache.get(1), Some(&moved));
    }

    #[test]
    fn test_large_rotation_replaces_cache() {
        let mut cache = MarkerCache::new();
        let first = marker_at(1, Vec2::new(10.0, 10.0), 0.0);
        let turned = marker_at(1, Vec2::new(10.0, 10.0), 3.0);
        cache.check(first, 2.0, 0);
        assert_eq!(cache.check(turned, 2.0, 1), turned);
    }

    #[test]
    fn test_ids_are_independent() {
        let mut cache = MarkerCache::new();
        let a = marker_at(1, Vec2::new(10.0, 10.0), 0.0);
        let b = marker_at(2, Vec2::new(10.5, 10.0), 0.0);
        cache.check(a, 2.0, 0);
        assert_eq!(cache.check(b, 2.0, 0), b);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_evict_stale() {
        let mut cache = MarkerCache::new();
        cache.check(marker_at(1, Vec2::ZERO, 0.0), 2.0, 0);
        cache.check(marker_at(2, Vec2::ZERO, 0.0), 2.0, 8);

        assert_eq!(cache.evict_stale(9, 10), 0);
        assert_eq!(cache.evict_stale(10, 10), 1);
        assert!(cache.get(1).is_none());
        assert!(cache.get(2).is_some());
    }

    #[test]
    fn test_jitter_still_refreshes_last_seen() {
        let mut cache = MarkerCache::new();
        cache.check(marker_at(1, Vec2::ZERO, 0.0), 2.0, 0);
        cache.check(marker_at(1, Vec2::new(0.5, 0.0), 0.0), 2.0, 9);
        assert_eq!(cache.evict_stale(15, 10), 0);
    }
}
