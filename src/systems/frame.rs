use bevy::prelude::*;

use crate::plugins::core::GameState;
use crate::resources::{ArSettings, FrameClock, MarkerFeed};

/// Advances the frame counter once per simulation tick.
pub fn advance_frame_clock(mut clock: ResMut<FrameClock>) {
    clock.advance();
}

/// Run condition: true on ticks where markers are sampled.
pub fn on_sampling_tick(clock: Res<FrameClock>, settings: Res<ArSettings>) -> bool {
    settings.is_sampling_frame(clock.frame)
}

/// Run condition: true while a marker source is installed and ready.
///
/// A source that drops out mid-game pauses sampling; placements keep their
/// last timestamps until it comes back.
pub fn marker_source_ready(feed: Option<Res<MarkerFeed>>) -> bool {
    feed.is_some_and(|feed| feed.0.is_ready())
}

/// Leaves warm-up as soon as the marker source reports ready.
pub fn await_marker_source(
    feed: Res<MarkerFeed>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if feed.0.is_ready() {
        info!("Marker source ready");
        next_state.set(GameState::Playing);
    }
}
