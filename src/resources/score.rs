use bevy::prelude::*;

/// Running tally of enemy outcomes and turret activity for the HUD.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub defeated: u32,
    pub escaped: u32,
    pub shots_fired: u32,
}

impl Score {
    pub fn formatted(&self) -> String {
        format!(
            "Defeated {} / Escaped {} / Shots {}",
            self.defeated, self.escaped, self.shots_fired
        )
    }
}
