use bevy::prelude::*;

/// Component applied to turret projectiles.
#[derive(Component, Debug, Clone, Reflect)]
pub struct Projectile {
    /// Image-space position.
    pub position: Vec2,
    /// Pixels per second.
    pub velocity: Vec2,
    pub damage: f32,
}

impl Projectile {
    pub const SPEED: f32 = 320.0;
    pub const RADIUS: f32 = 3.0;

    pub fn new(position: Vec2, direction: Vec2, damage: f32) -> Self {
        Self {
            position,
            velocity: direction.normalize_or_zero() * Self::SPEED,
            damage,
        }
    }

    /// True if the projectile overlaps a circle at `center`.
    pub fn hits(&self, center: Vec2, radius: f32) -> bool {
        self.position.distance_squared(center) <= (radius + Self::RADIUS).powi(2)
    }
}

/// Component to handle projectile despawning after some time.
#[derive(Component)]
pub struct ProjectileTimer(pub Timer);

impl Default for ProjectileTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(1.5, TimerMode::Once))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_uses_fixed_speed() {
        let p = Projectile::new(Vec2::ZERO, Vec2::new(3.0, 4.0), 1.0);
        assert!((p.velocity.length() - Projectile::SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_hits() {
        let p = Projectile::new(Vec2::ZERO, Vec2::X, 1.0);
        assert!(p.hits(Vec2::new(10.0, 0.0), 8.0));
        assert!(!p.hits(Vec2::new(12.0, 0.0), 8.0));
    }
}
