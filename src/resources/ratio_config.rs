//! Per-marker calibration tables and the inclusion rules that decide which
//! markers become turrets and which become walls.

use std::collections::{BTreeMap, BTreeSet};
use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::components::{MarkerId, PlacementKind, TurretType};

/// Physical-to-virtual scale and type tag for one turret marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioConfig {
    pub id: MarkerId,
    /// Printed size of the marker code.
    pub code_width: f32,
    /// Desired rendered size, in the same unit as `code_width`.
    pub diameter: f32,
    /// Subtracted from the detected angle so the barrel points "forward".
    pub rotation_offset: f32,
    pub turret_type: TurretType,
}

impl RatioConfig {
    pub fn new(id: MarkerId, turret_type: TurretType) -> Self {
        Self {
            id,
            code_width: 2.5,
            diameter: 4.0,
            rotation_offset: FRAC_PI_2,
            turret_type,
        }
    }

    /// Rendered diameter per unit of measured marker edge.
    pub fn scale(&self) -> f32 {
        self.diameter / self.code_width
    }
}

/// How a placement family sizes and tags a marker it accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementParams {
    pub scale: f32,
    pub rotation_offset: f32,
    pub kind: PlacementKind,
}

/// Inclusion predicate plus sizing for one placement family.
///
/// Each implementor is a resource and owns its own `PlacementRegistry`.
pub trait PlacementRule: Resource {
    /// Name used in logs.
    const FAMILY: &'static str;

    /// Returns `None` when markers with this id do not belong to the family.
    fn params_for(&self, id: MarkerId) -> Option<PlacementParams>;
}

/// Turret calibration keyed by marker id. Fixed at startup.
#[derive(Resource, Debug, Clone)]
pub struct RatioTable {
    ratios: BTreeMap<MarkerId, RatioConfig>,
}

impl Default for RatioTable {
    fn default() -> Self {
        Self::from_configs([
            RatioConfig::new(40, TurretType::Gatling),
            RatioConfig::new(41, TurretType::Gatling),
            RatioConfig::new(50, TurretType::Spray),
            RatioConfig::new(51, TurretType::Spray),
        ])
    }
}

impl RatioTable {
    pub fn from_configs(configs: impl IntoIterator<Item = RatioConfig>) -> Self {
        Self {
            ratios: configs.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn get(&self, id: MarkerId) -> Option<&RatioConfig> {
        self.ratios.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.ratios.keys().copied()
    }
}

impl PlacementRule for RatioTable {
    const FAMILY: &'static str = "turret";

    fn params_for(&self, id: MarkerId) -> Option<PlacementParams> {
        self.get(id).map(|ratio| PlacementParams {
            scale: ratio.scale(),
            rotation_offset: ratio.rotation_offset,
            kind: PlacementKind::Turret(ratio.turret_type),
        })
    }
}

/// Every marker that is not a turret is a wall; calibration ids are walls
/// tagged as play-area anchors. Walls keep their measured size and raw angle.
#[derive(Resource, Debug, Clone, Default)]
pub struct WallRule {
    turret_ids: BTreeSet<MarkerId>,
    calibration_ids: BTreeSet<MarkerId>,
}

impl WallRule {
    pub fn new(
        ratios: &RatioTable,
        calibration_ids: impl IntoIterator<Item = MarkerId>,
    ) -> Self {
        Self {
            turret_ids: ratios.ids().collect(),
            calibration_ids: calibration_ids.into_iter().collect(),
        }
    }
}

impl PlacementRule for WallRule {
    const FAMILY: &'static str = "wall";

    fn params_for(&self, id: MarkerId) -> Option<PlacementParams> {
        if self.turret_ids.contains(&id) {
            return None;
        }
        let kind = if self.calibration_ids.contains(&id) {
            PlacementKind::Calibration
        } else {
            PlacementKind::Wall
        };
        Some(PlacementParams {
            scale: 1.0,
            rotation_offset: 0.0,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = RatioTable::default();
        assert_eq!(table.get(40).unwrap().turret_type, TurretType::Gatling);
        assert_eq!(table.get(51).unwrap().turret_type, TurretType::Spray);
        assert!(table.get(42).is_none());
        assert!((table.get(40).unwrap().scale() - 1.6).abs() < 1e-6);
    }

    #[test]
    fn test_turret_rule_rejects_unknown_ids() {
        let table = RatioTable::default();
        assert!(table.params_for(7).is_none());
        let params = table.params_for(50).unwrap();
        assert_eq!(params.kind, PlacementKind::Turret(TurretType::Spray));
        assert!((params.rotation_offset - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_wall_rule_excludes_turrets() {
        let rule = WallRule::new(&RatioTable::default(), [0, 1]);
        assert!(rule.params_for(40).is_none());
        assert_eq!(rule.params_for(1).unwrap().kind, PlacementKind::Calibration);
        let wall = rule.params_for(12).unwrap();
        assert_eq!(wall.kind, PlacementKind::Wall);
        assert_eq!(wall.scale, 1.0);
        assert_eq!(wall.rotation_offset, 0.0);
    }
}
