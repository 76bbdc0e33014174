//! Runtime options for marker sampling, smoothing and the game loop.
//!
//! Loaded once at startup from JSON (see `ArSettings::load`) and treated as
//! read-only input by the sync systems. The debug panel may flip the
//! display toggles at runtime.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

const SETTINGS_DIR_NAME: &str = "ar-tower-defense";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Failure while reading a JSON input file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and deserializes a JSON file.
pub fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, SettingsError> {
    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArSettings {
    /// Markers are sampled and synchronized every N frames.
    pub sample_markers_delay: u64,
    /// Center distance (pixels) and angle delta (radians) below which a new
    /// reading is treated as detector jitter.
    pub cache_hit_threshold: f32,
    /// Frames a placement survives after its marker was last seen.
    pub preserve_frames: u64,
    /// Frames per second of the simulation tick.
    pub target_frame_rate: f64,
    /// Draws raw markers, the path grid and calibration anchors.
    pub debug: bool,
    /// When on, the background is cleared transparent so the camera layer
    /// behind the overlay stays visible.
    pub show_video_feed: bool,
    /// Forget cached marker readings that have not been seen for
    /// `preserve_frames` frames.
    pub evict_stale_markers: bool,
    /// Despawn turret objects whose placement has expired. Off by default:
    /// a turret stays active once created.
    pub despawn_lost_turrets: bool,
    /// Size of the detector image in pixels.
    pub video_width: f32,
    pub video_height: f32,
    /// Edge length of one pathfinding cell in image pixels.
    pub grid_cell_size: f32,
    /// Seconds between enemy spawns.
    pub enemy_spawn_interval: f32,
    /// Marker ids that anchor the play area.
    pub calibration_ids: Vec<u32>,
}

impl Default for ArSettings {
    fn default() -> Self {
        Self {
            sample_markers_delay: 5,
            cache_hit_threshold: 2.0,
            preserve_frames: 30,
            target_frame_rate: 60.0,
            debug: false,
            show_video_feed: true,
            evict_stale_markers: true,
            despawn_lost_turrets: false,
            video_width: 640.0,
            video_height: 480.0,
            grid_cell_size: 32.0,
            enemy_spawn_interval: 2.0,
            calibration_ids: vec![0, 1, 2, 3],
        }
    }
}

impl ArSettings {
    pub fn frame_size(&self) -> Vec2 {
        Vec2::new(self.video_width, self.video_height)
    }

    /// True on frames where markers should be sampled.
    pub fn is_sampling_frame(&self, frame: u64) -> bool {
        frame % self.sample_markers_delay.max(1) == 0
    }

    /// Default location of the settings file inside the user config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push(SETTINGS_DIR_NAME);
            path.push(SETTINGS_FILE_NAME);
            path
        })
    }

    /// Resolves settings from an explicit path, then the default location,
    /// then built-in defaults. Load failures are logged and fall back to
    /// defaults.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    info!("No settings file found, using defaults");
                    return Self::default();
                }
            },
        };

        match read_json::<ArSettings>(&path) {
            Ok(settings) => {
                info!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                error!("{}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: ArSettings =
            serde_json::from_str(r#"{"preserve_frames": 5, "debug": true}"#).unwrap();
        assert_eq!(settings.preserve_frames, 5);
        assert!(settings.debug);
        assert_eq!(settings.sample_markers_delay, 5);
        assert_eq!(settings.calibration_ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_sampling_frame() {
        let settings = ArSettings { sample_markers_delay: 3, ..default() };
        assert!(settings.is_sampling_frame(0));
        assert!(!settings.is_sampling_frame(1));
        assert!(settings.is_sampling_frame(9));
    }

    #[test]
    fn test_zero_delay_samples_every_frame() {
        let settings = ArSettings { sample_markers_delay: 0, ..default() };
        assert!(settings.is_sampling_frame(7));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = ArSettings::load(Some(Path::new("/nonexistent/settings.json")));
        assert_eq!(settings, ArSettings::default());
    }

    #[test]
    fn test_read_json_reports_parse_error() {
        let path = std::env::temp_dir().join("ar_td_bad_settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        let result = read_json::<ArSettings>(&path);
        assert!(matches!(result, Err(SettingsError::Parse { .. })));
        let _ = std::fs::remove_file(&path);
    }
}
