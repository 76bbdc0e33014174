use bevy::prelude::*;

use crate::resources::*;

/// Resolves startup configuration: command-line flags, the settings file
/// and the marker source.
///
/// Add after `DefaultPlugins` so load failures reach the log, and before
/// the plugins that read `ArSettings` while building.
pub struct ConfigPlugin {
    pub args: CliArgs,
}

impl ConfigPlugin {
    pub fn from_env() -> Self {
        Self {
            args: CliArgs::parse(),
        }
    }
}

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let mut settings = ArSettings::load(self.args.settings.as_deref());
        if self.args.debug {
            settings.debug = true;
        }

        app.insert_resource(settings)
            .insert_resource(self.args.clone())
            .insert_resource(open_marker_feed(&self.args));
    }
}

fn open_marker_feed(args: &CliArgs) -> MarkerFeed {
    let Some(path) = args.replay.as_deref() else {
        info!("No replay given, using the demo marker layout");
        return MarkerFeed::new(StaticMarkerSource::demo_layout());
    };

    match ReplayMarkerSource::from_file(path) {
        Ok(source) if source.is_ready() => MarkerFeed::new(source),
        Ok(_) => {
            warn!("Replay {:?} has no frames, using the demo marker layout", path);
            MarkerFeed::new(StaticMarkerSource::demo_layout())
        }
        Err(e) => {
            error!("{}", e);
            MarkerFeed::new(StaticMarkerSource::demo_layout())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_debug_flag_overrides_settings() {
        let mut app = App::new();
        app.add_plugins(ConfigPlugin {
            args: CliArgs {
                settings: Some(PathBuf::from("/nonexistent/settings.json")),
                debug: true,
                ..default()
            },
        });

        let settings = app.world().resource::<ArSettings>();
        assert!(settings.debug);
        assert_eq!(settings.preserve_frames, ArSettings::default().preserve_frames);
    }

    #[test]
    fn test_missing_replay_falls_back_to_demo() {
        let mut app = App::new();
        app.add_plugins(ConfigPlugin {
            args: CliArgs {
                replay: Some(PathBuf::from("/nonexistent/replay.json")),
                ..default()
            },
        });

        let feed = app.world_mut().resource_mut::<MarkerFeed>().0.markers();
        assert_eq!(feed.len(), StaticMarkerSource::demo_layout().markers.len());
    }

    #[test]
    fn test_replay_file_is_played_back() {
        let path = std::env::temp_dir().join("ar_td_replay_frames.json");
        let frames = vec![
            vec![square_marker(40, Vec2::new(10.0, 10.0), 4.0, 0.0)],
            Vec::new(),
        ];
        std::fs::write(&path, serde_json::to_string(&frames).unwrap()).unwrap();

        let mut app = App::new();
        app.add_plugins(ConfigPlugin {
            args: CliArgs {
                replay: Some(path.clone()),
                ..default()
            },
        });

        let mut feed = app.world_mut().resource_mut::<MarkerFeed>();
        assert_eq!(feed.0.markers().len(), 1);
        assert!(feed.0.markers().is_empty());
        assert_eq!(feed.0.markers()[0].id, 40);
        let _ = std::fs::remove_file(&path);
    }
}
