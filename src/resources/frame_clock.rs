use bevy::prelude::*;

/// Frame counter for the simulation tick.
///
/// Advances once per fixed tick while the game is playing. Placement
/// timestamps and the sampling cadence are measured in these frames.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    pub frame: u64,
}

impl FrameClock {
    pub fn advance(&mut self) {
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.frame, 0);
        clock.advance();
        clock.advance();
        assert_eq!(clock.frame, 2);
    }
}
