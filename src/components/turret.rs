//! Long-lived turret objects.
//!
//! A turret is created the first time its marker is placed and then lives
//! on its own: placements refresh where it stands and where it points,
//! while `Turret::update` runs every tick to drive cooldown and firing.

use bevy::prelude::*;

use super::marker::MarkerId;
use super::placement::{Placement, TurretType};

/// Enemies farther than this many diameters from the turret are ignored.
pub const RANGE_IN_DIAMETERS: f32 = 6.0;

/// Firing pattern and cooldown state.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum TurretBehavior {
    /// One projectile at a short interval, narrow firing arc.
    Gatling { cooldown: f32 },
    /// A fan of projectiles at a long interval, wide firing arc.
    Spray { cooldown: f32 },
}

impl TurretBehavior {
    pub const GATLING_INTERVAL: f32 = 0.15;
    pub const SPRAY_INTERVAL: f32 = 0.9;
    pub const SPRAY_PELLETS: usize = 5;
    pub const SPRAY_FAN: f32 = 0.6;

    pub fn new(turret_type: TurretType) -> Self {
        match turret_type {
            TurretType::Gatling => Self::Gatling { cooldown: 0.0 },
            TurretType::Spray => Self::Spray { cooldown: 0.0 },
        }
    }

    pub fn turret_type(&self) -> TurretType {
        match self {
            Self::Gatling { .. } => TurretType::Gatling,
            Self::Spray { .. } => TurretType::Spray,
        }
    }

    /// Half-angle of the cone, around the barrel, in which targets are taken.
    pub fn firing_arc(&self) -> f32 {
        match self {
            Self::Gatling { .. } => 0.35,
            Self::Spray { .. } => 0.6,
        }
    }

    pub fn damage(&self) -> f32 {
        match self {
            Self::Gatling { .. } => 4.0,
            Self::Spray { .. } => 6.0,
        }
    }

    fn cooldown_mut(&mut self) -> &mut f32 {
        match self {
            Self::Gatling { cooldown } | Self::Spray { cooldown } => cooldown,
        }
    }

    fn interval(&self) -> f32 {
        match self {
            Self::Gatling { .. } => Self::GATLING_INTERVAL,
            Self::Spray { .. } => Self::SPRAY_INTERVAL,
        }
    }

    /// Shot headings for one volley fired along `angle`.
    fn pattern(&self, angle: f32) -> Vec<f32> {
        match self {
            Self::Gatling { .. } => vec![angle],
            Self::Spray { .. } => {
                let step = Self::SPRAY_FAN / (Self::SPRAY_PELLETS - 1) as f32;
                (0..Self::SPRAY_PELLETS)
                    .map(|i| angle - Self::SPRAY_FAN / 2.0 + step * i as f32)
                    .collect()
            }
        }
    }
}

/// Projectiles released by one trigger pull, in image space.
#[derive(Debug, Clone, PartialEq)]
pub struct Volley {
    pub origin: Vec2,
    /// Unit direction per projectile.
    pub directions: Vec<Vec2>,
    pub damage: f32,
}

/// A turret standing on the playfield.
#[derive(Component, Debug, Clone, Reflect)]
pub struct Turret {
    pub id: MarkerId,
    /// Image-space center.
    pub position: Vec2,
    pub diameter: f32,
    /// Barrel heading in image space, radians.
    pub angle: f32,
    /// Enemy currently being engaged.
    pub target: Option<Entity>,
    pub behavior: TurretBehavior,
}

impl Turret {
    /// Creates the turret for a turret placement; `None` for walls.
    pub fn from_placement(placement: &Placement) -> Option<Self> {
        let turret_type = placement.turret_type()?;
        Some(Self {
            id: placement.id,
            position: placement.center,
            diameter: placement.diameter,
            angle: placement.angle,
            target: None,
            behavior: TurretBehavior::new(turret_type),
        })
    }

    /// Moves and re-aims the turret to match a fresh placement.
    pub fn update_from_placement(&mut self, placement: &Placement) {
        self.position = placement.center;
        self.diameter = placement.diameter;
        self.angle = placement.angle;
    }

    pub fn range(&self) -> f32 {
        self.diameter * RANGE_IN_DIAMETERS
    }

    /// Where projectiles leave the barrel.
    pub fn muzzle(&self) -> Vec2 {
        self.position + Vec2::from_angle(self.angle) * self.diameter * 0.75
    }

    /// Advances cooldown by `dt` seconds with the barrel at `angle`.
    ///
    /// Fires when the cooldown has elapsed and a target is held; the
    /// cooldown then restarts. Without a target the turret stays loaded.
    pub fn update(&mut self, angle: f32, dt: f32) -> Option<Volley> {
        self.angle = angle;

        let interval = self.behavior.interval();
        let cooldown = self.behavior.cooldown_mut();
        *cooldown = (*cooldown - dt).max(0.0);
        if *cooldown > 0.0 || self.target.is_none() {
            return None;
        }
        *cooldown = interval;

        Some(Volley {
            origin: self.muzzle(),
            directions: self
                .behavior
                .pattern(angle)
                .into_iter()
                .map(Vec2::from_angle)
                .collect(),
            damage: self.behavior.damage(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Marker, PlacementKind};

    fn placement(turret_type: TurretType, center: Vec2, angle: f32) -> Placement {
        let marker = Marker::new(
            40,
            [
                center + Vec2::new(-5.0, -5.0),
                center + Vec2::new(5.0, -5.0),
                center + Vec2::new(5.0, 5.0),
                center + Vec2::new(-5.0, 5.0),
            ],
            center,
            angle,
        );
        Placement::from_marker(&marker, 1.6, 0.0, PlacementKind::Turret(turret_type), 0)
    }

    #[test]
    fn test_walls_do_not_make_turrets() {
        let marker = Marker::new(12, [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y], Vec2::splat(0.5), 0.0);
        let wall = Placement::from_marker(&marker, 1.0, 0.0, PlacementKind::Wall, 0);
        assert!(Turret::from_placement(&wall).is_none());
    }

    #[test]
    fn test_update_from_placement() {
        let mut turret =
            Turret::from_placement(&placement(TurretType::Gatling, Vec2::ZERO, 0.0)).unwrap();
        turret.update_from_placement(&placement(TurretType::Gatling, Vec2::new(50.0, 20.0), 1.0));
        assert_eq!(turret.position, Vec2::new(50.0, 20.0));
        assert_eq!(turret.angle, 1.0);
        assert!((turret.diameter - 16.0).abs() < 1e-4);
    }

    #[test]
    fn test_no_fire_without_target() {
        let mut turret =
            Turret::from_placement(&placement(TurretType::Gatling, Vec2::ZERO, 0.0)).unwrap();
        assert!(turret.update(0.0, 1.0).is_none());
    }

    #[test]
    fn test_gatling_cadence() {
        let mut turret =
            Turret::from_placement(&placement(TurretType::Gatling, Vec2::ZERO, 0.0)).unwrap();
        turret.target = Some(Entity::from_raw(1));

        let volley = turret.update(0.0, 0.0).unwrap();
        assert_eq!(volley.directions.len(), 1);
        assert!((volley.directions[0] - Vec2::X).length() < 1e-5);

        assert!(turret.update(0.0, 0.1).is_none());
        assert!(turret.update(0.0, 0.1).is_some());
    }

    #[test]
    fn test_spray_fans_around_barrel() {
        let mut turret =
            Turret::from_placement(&placement(TurretType::Spray, Vec2::ZERO, 0.0)).unwrap();
        turret.target = Some(Entity::from_raw(1));

        let volley = turret.update(0.0, 0.0).unwrap();
        assert_eq!(volley.directions.len(), TurretBehavior::SPRAY_PELLETS);
        let mean: Vec2 = volley.directions.iter().copied().sum::<Vec2>() / volley.directions.len() as f32;
        assert!(mean.y.abs() < 1e-5);
        assert!(mean.x > 0.9);

        assert!(turret.update(0.0, 0.5).is_none());
        assert!(turret.update(0.0, 0.5).is_some());
    }

    #[test]
    fn test_update_tracks_angle() {
        let mut turret =
            Turret::from_placement(&placement(TurretType::Gatling, Vec2::ZERO, 0.0)).unwrap();
        turret.update(std::f32::consts::FRAC_PI_2, 0.0);
        assert!((turret.muzzle() - Vec2::new(0.0, 12.0)).length() < 1e-3);
    }
}
