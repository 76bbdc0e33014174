use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::plugins::input::get_default_input_map;
use crate::resources::{ArSettings, FrameClock, MarkerFeed};
use crate::systems::{advance_frame_clock, await_marker_source, marker_source_ready, on_sampling_tick};

#[derive(States, Default, Clone, Eq, PartialEq, Debug, Hash)]
pub enum GameState {
    /// Waiting for the camera and detector.
    #[default]
    Warmup,
    Playing,
}

/// Ordering of the per-tick work in `FixedUpdate`.
///
/// `Sample` only runs on sampling ticks while the marker source is ready. Everything in `Simulate` runs
/// every tick and reads whatever the latest sample produced.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Tick,
    Sample,
    Simulate,
}

/// Frame clock, game state and the tick schedule. Split out of
/// `CorePlugin` so headless apps can run the simulation without a camera.
pub struct FrameSchedulePlugin;

impl Plugin for FrameSchedulePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArSettings>();
        let target_frame_rate = app.world().resource::<ArSettings>().target_frame_rate;

        app.init_state::<GameState>()
            .init_resource::<FrameClock>()
            .insert_resource(Time::<Fixed>::from_hz(target_frame_rate.max(1.0)))
            .configure_sets(
                FixedUpdate,
                (
                    FrameSet::Tick,
                    FrameSet::Sample.run_if(on_sampling_tick.and(marker_source_ready)),
                    FrameSet::Simulate,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(FixedUpdate, advance_frame_clock.in_set(FrameSet::Tick))
            .add_systems(
                Update,
                await_marker_source.run_if(
                    in_state(GameState::Warmup).and(resource_exists::<MarkerFeed>),
                ),
            );
    }
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(FrameSchedulePlugin)
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, log_state_transitions);
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_xyz(0.0, 0.0, 100.0),
        InputManagerBundle::with_map(get_default_input_map()),
    ));
}

fn log_state_transitions(state: Res<State<GameState>>) {
    if state.is_changed() {
        info!("Current State: {:?}", state.get());
    }
}
