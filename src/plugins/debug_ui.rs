use bevy::prelude::*;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy_egui::{egui, EguiContexts};
use crate::plugins::core::GameState;
use crate::resources::*;

pub struct DebugUiPlugin;

impl Plugin for DebugUiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<FrameTimeDiagnosticsPlugin>() {
            app.add_plugins(FrameTimeDiagnosticsPlugin::default());
        }

        app.add_systems(Update, debug_panel);
    }
}

#[allow(clippy::too_many_arguments)]
fn debug_panel(
    mut contexts: EguiContexts,
    state: Res<State<GameState>>,
    diagnostics: Res<DiagnosticsStore>,
    clock: Res<FrameClock>,
    turrets: Res<TurretRegistry>,
    walls: Res<WallRegistry>,
    active: Res<ActiveTurrets>,
    cache: Res<MarkerCache>,
    score: Res<Score>,
    mut settings: ResMut<ArSettings>,
) {
    egui::Window::new("Debug Panel").show(contexts.ctx_mut(), |ui| {
        ui.label(format!("Current State: {:?}", state.get()));

        if let Some(fps) = diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(|diag| diag.smoothed())
        {
            ui.label(format!("FPS: {:.1}", fps));
        }
        ui.label(format!("Frame: {}", clock.frame));

        ui.separator();
        ui.heading("Markers");
        ui.label(format!("Cached: {}", cache.len()));
        ui.label(format!("Turret placements: {}", turrets.len()));
        ui.label(format!("Wall placements: {}", walls.len()));
        ui.label(format!("Active turrets: {}", active.len()));

        ui.separator();
        ui.label(score.formatted());

        ui.separator();
        ui.heading("Display");

        // Only touch the resource on an actual change so change detection stays quiet
        let mut debug = settings.debug;
        if ui.checkbox(&mut debug, "Debug overlay").changed() {
            settings.debug = debug;
        }
        let mut show_video_feed = settings.show_video_feed;
        if ui.checkbox(&mut show_video_feed, "Show video feed").changed() {
            settings.show_video_feed = show_video_feed;
        }
    });
}
