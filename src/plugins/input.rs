use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::resources::ArSettings;

#[derive(Actionlike, PartialEq, Eq, Clone, Copy, Hash, Debug, Reflect)]
pub enum ArAction {
    ToggleDebug,
    ToggleVideoFeed,
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<ArAction>::default())
            .add_systems(Update, toggle_display_options);
    }
}

pub fn get_default_input_map() -> InputMap<ArAction> {
    let mut input_map = InputMap::default();
    input_map.insert(ArAction::ToggleDebug, KeyCode::F1);
    input_map.insert(ArAction::ToggleVideoFeed, KeyCode::F2);
    input_map
}

fn toggle_display_options(
    query: Query<&ActionState<ArAction>>,
    mut settings: ResMut<ArSettings>,
) {
    for action_state in &query {
        if action_state.just_pressed(&ArAction::ToggleDebug) {
            settings.debug = !settings.debug;
            info!("Debug overlay {}", if settings.debug { "on" } else { "off" });
        }
        if action_state.just_pressed(&ArAction::ToggleVideoFeed) {
            settings.show_video_feed = !settings.show_video_feed;
            info!("Video feed {}", if settings.show_video_feed { "shown" } else { "hidden" });
        }
    }
}
