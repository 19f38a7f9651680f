// SPDX-License-Identifier: MIT OR Apache-2.0
//! Visualizer settings stored as RON.
//!
//! Every field has a default, so a settings file only needs to name what it
//! changes:
//!
//! ```ron
//! (
//!     input_path: "graphs/maze.txt",
//!     step_delay: 0.4,
//!     initial_mode: Dfs,
//! )
//! ```

use node_traversal_graph::{LayoutConfig, SearchMode};
use node_traversal_playback::{SessionConfig, DEFAULT_STEP_DELAY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file looked up in the working directory
pub const SETTINGS_FILE_NAME: &str = "node_traversal.ron";

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Window title
    pub title: String,
    /// Inner width in logical pixels
    pub width: u32,
    /// Inner height in logical pixels
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Node-Traversal".to_string(),
            width: 1000,
            height: 1000,
        }
    }
}

/// All visualizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerSettings {
    /// Format version
    pub version: u32,
    /// Adjacency file to load
    pub input_path: PathBuf,
    /// Seconds between playback steps
    pub step_delay: f32,
    /// Mode of the first run
    pub initial_mode: SearchMode,
    /// Node placement
    pub layout: LayoutConfig,
    /// Window configuration
    pub window: WindowSettings,
    /// Reload the graph when the input file changes
    pub watch_input: bool,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            input_path: PathBuf::from("test.txt"),
            step_delay: DEFAULT_STEP_DELAY,
            initial_mode: SearchMode::Bfs,
            layout: LayoutConfig::default(),
            window: WindowSettings::default(),
            watch_input: true,
        }
    }
}

impl VisualizerSettings {
    /// Load settings from a RON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Parse settings from RON text
    pub fn from_ron(content: &str) -> Result<Self, SettingsError> {
        let settings: VisualizerSettings = ron::from_str(content)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Load settings, using defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let settings = Self::load(path)?;
        tracing::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings as pretty RON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Serialize settings as pretty RON
    pub fn to_ron(&self) -> Result<String, SettingsError> {
        let config = ron::ser::PrettyConfig::default()
            .depth_limit(4)
            .indentor("    ".to_string());
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Options for a new search session
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            mode: self.initial_mode,
            step_delay: self.step_delay,
            layout: self.layout,
        }
    }
}

/// Error when loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed RON
    #[error("Invalid settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failed
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),

    /// Written by a newer version
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = VisualizerSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.input_path, PathBuf::from("test.txt"));
        assert_eq!(settings.step_delay, 0.2);
        assert_eq!(settings.layout.spacing_x, 75.0);
        assert_eq!(settings.window.width, 1000);
    }

    #[test]
    fn test_serialization() {
        let mut settings = VisualizerSettings::default();
        settings.initial_mode = SearchMode::Dfs;
        settings.layout.spacing_y = 90.0;
        let ron_str = settings.to_ron().unwrap();
        let loaded = VisualizerSettings::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded = VisualizerSettings::from_ron("(step_delay: 0.5, initial_mode: Dfs)").unwrap();
        assert_eq!(loaded.step_delay, 0.5);
        assert_eq!(loaded.initial_mode, SearchMode::Dfs);
        assert_eq!(loaded.input_path, PathBuf::from("test.txt"));
        assert_eq!(loaded.layout, LayoutConfig::default());
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = VisualizerSettings::from_ron("(version: 99)").unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedVersion { found: 99, .. }));
    }

    #[test]
    fn test_malformed_file_rejected() {
        assert!(matches!(
            VisualizerSettings::from_ron("(step_delay: \"slow\")"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("node_traversal_no_settings.ron");
        let _ = std::fs::remove_file(&path);
        let settings = VisualizerSettings::load_or_default(&path).unwrap();
        assert_eq!(settings, VisualizerSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("node_traversal_settings_test.ron");
        let mut settings = VisualizerSettings::default();
        settings.watch_input = false;
        settings.save(&path).unwrap();
        let loaded = VisualizerSettings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
