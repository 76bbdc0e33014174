use bevy::prelude::*;

/// An enemy walking the route from entry to exit.
#[derive(Component, Debug, Clone, Reflect)]
pub struct Enemy {
    /// Image-space position.
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// Pixels per second.
    pub speed: f32,
    /// Remaining waypoints, the exit last.
    pub waypoints: Vec<Vec2>,
    /// `PathGrid` version the waypoints were planned against.
    pub route_version: u64,
}

impl Enemy {
    pub const RADIUS: f32 = 8.0;
    pub const DEFAULT_HEALTH: f32 = 40.0;
    pub const DEFAULT_SPEED: f32 = 40.0;

    pub fn new(position: Vec2, waypoints: Vec<Vec2>, route_version: u64) -> Self {
        Self {
            position,
            health: Self::DEFAULT_HEALTH,
            max_health: Self::DEFAULT_HEALTH,
            speed: Self::DEFAULT_SPEED,
            waypoints,
            route_version,
        }
    }

    /// Replaces the remaining waypoints after the route changed.
    pub fn replan(&mut self, waypoints: Vec<Vec2>, route_version: u64) {
        self.waypoints = waypoints;
        self.route_version = route_version;
    }

    /// Walks up to `speed * dt` pixels along the waypoints.
    /// Returns true once the last waypoint is reached.
    pub fn advance(&mut self, dt: f32) -> bool {
        let mut budget = self.speed * dt;
        while budget > 0.0 {
            let Some(&next) = self.waypoints.first() else {
                return true;
            };
            let to_next = next - self.position;
            let distance = to_next.length();
            if distance <= budget {
                self.position = next;
                self.waypoints.remove(0);
                budget -= distance;
            } else {
                self.position += to_next / distance * budget;
                budget = 0.0;
            }
        }
        self.waypoints.is_empty()
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0.0
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_along_waypoints() {
        let mut enemy = Enemy::new(Vec2::ZERO, vec![Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)], 0);
        enemy.speed = 5.0;

        assert!(!enemy.advance(1.0));
        assert_eq!(enemy.position, Vec2::new(5.0, 0.0));

        // Crosses the corner within one step
        assert!(!enemy.advance(2.0));
        assert_eq!(enemy.position, Vec2::new(10.0, 5.0));

        assert!(enemy.advance(1.0));
        assert_eq!(enemy.position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_no_waypoints_means_arrived() {
        let mut enemy = Enemy::new(Vec2::ZERO, Vec::new(), 0);
        assert!(enemy.advance(0.1));
    }

    #[test]
    fn test_damage() {
        let mut enemy = Enemy::new(Vec2::ZERO, Vec::new(), 0);
        enemy.take_damage(10.0);
        assert!(!enemy.is_defeated());
        assert!((enemy.health_ratio() - 0.75).abs() < 1e-6);
        enemy.take_damage(30.0);
        assert!(enemy.is_defeated());
        assert_eq!(enemy.health_ratio(), 0.0);
    }
}
