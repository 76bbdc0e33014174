//! Time-persistent placement records, one registry per placement family.
//!
//! A placement survives for `preserve_frames` frames after its marker was
//! last observed, so a tag that drops out of detection for a few frames
//! does not make its turret or wall flicker.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use bevy::prelude::*;

use crate::components::{Marker, MarkerId, Placement};
use crate::resources::marker_cache::MarkerCache;
use crate::resources::ratio_config::{PlacementRule, RatioTable, WallRule};

/// Turret placements, keyed by marker id.
pub type TurretRegistry = PlacementRegistry<RatioTable>;
/// Wall and calibration placements, keyed by marker id.
pub type WallRegistry = PlacementRegistry<WallRule>;

/// Thresholds the synchronizer needs from `ArSettings`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncParams {
    pub cache_hit_threshold: f32,
    pub preserve_frames: u64,
}

/// Latest placement per marker id for the family described by `R`.
///
/// Ordered by id so that registries built from the same inputs compare
/// equal and render in a stable order.
#[derive(Resource)]
pub struct PlacementRegistry<R: PlacementRule> {
    entries: BTreeMap<MarkerId, Placement>,
    _rule: PhantomData<fn() -> R>,
}

impl<R: PlacementRule> Default for PlacementRegistry<R> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            _rule: PhantomData,
        }
    }
}

impl<R: PlacementRule> Clone for PlacementRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            _rule: PhantomData,
        }
    }
}

impl<R: PlacementRule> PartialEq for PlacementRegistry<R> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<R: PlacementRule> fmt::Debug for PlacementRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementRegistry")
            .field("family", &R::FAMILY)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<R: PlacementRule> PlacementRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one sampling tick's markers into the registry.
    ///
    /// Markers the rule rejects are ignored. Accepted markers are debounced
    /// through `cache`, sized, stamped with `frame` and replace any earlier
    /// placement with the same id. Placements not seen this tick are carried
    /// over, then everything older than the grace period is dropped.
    ///
    /// Returns the number of placements observed this tick.
    pub fn synchronize(
        &mut self,
        markers: &[Marker],
        frame: u64,
        rule: &R,
        cache: &mut MarkerCache,
        params: SyncParams,
    ) -> usize {
        let found: Vec<Placement> = markers
            .iter()
            .filter_map(|marker| rule.params_for(marker.id).map(|rule_params| (marker, rule_params)))
            .map(|(marker, rule_params)| {
                let marker = cache.check(*marker, params.cache_hit_threshold, frame);
                Placement::from_marker(&marker, rule_params.scale, rule_params.rotation_offset, rule_params.kind, frame)
            })
            .collect();

        let observed = found.len();
        for placement in found {
            self.entries.insert(placement.id, placement);
        }

        self.prune(frame, params.preserve_frames);
        observed
    }

    /// Drops placements whose age has reached `preserve_frames`.
    /// Returns the ids that were removed.
    pub fn prune(&mut self, current_frame: u64, preserve_frames: u64) -> Vec<MarkerId> {
        let expired: Vec<MarkerId> = self
            .entries
            .values()
            .filter(|p| !p.is_fresh(current_frame, preserve_frames))
            .map(|p| p.id)
            .collect();

        for id in &expired {
            self.entries.remove(id);
        }
        if !expired.is_empty() {
            debug!("Expired {} placements: {:?}", R::FAMILY, expired);
        }
        expired
    }

    pub fn get(&self, id: MarkerId) -> Option<&Placement> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: MarkerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Placements in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
