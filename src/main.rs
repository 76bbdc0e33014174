use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use ar_tower_defense::plugins::combat::CombatPlugin;
use ar_tower_defense::plugins::config::ConfigPlugin;
use ar_tower_defense::plugins::core::CorePlugin;
use ar_tower_defense::plugins::debug_ui::DebugUiPlugin;
use ar_tower_defense::plugins::input::InputPlugin;
use ar_tower_defense::plugins::marker_sync::MarkerSyncPlugin;
use ar_tower_defense::plugins::overlay::OverlayPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "AR Tower Defense".into(),
                resolution: (640.0, 480.0).into(),
                transparent: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        // Settings must be in place before the plugins below read them
        .add_plugins(ConfigPlugin::from_env())
        .add_plugins(CorePlugin)
        .add_plugins(InputPlugin)
        .add_plugins(MarkerSyncPlugin)
        .add_plugins(CombatPlugin)
        .add_plugins(OverlayPlugin)
        .add_plugins(DebugUiPlugin)
        .run();
}
