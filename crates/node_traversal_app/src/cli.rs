// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command line arguments.

use crate::settings::{SettingsError, VisualizerSettings, SETTINGS_FILE_NAME};
use clap::Parser;
use node_traversal_graph::SearchMode;
use std::path::PathBuf;

/// Animated BFS/DFS over a graph described by `a - > b, c` lines
#[derive(Debug, Parser)]
#[command(name = "node_traversal", version, about)]
pub struct Cli {
    /// Adjacency file to load (overrides the settings file)
    pub input: Option<PathBuf>,

    /// Settings file
    #[arg(long, default_value = SETTINGS_FILE_NAME)]
    pub config: PathBuf,

    /// Start in depth-first mode
    #[arg(long)]
    pub dfs: bool,

    /// Seconds between playback steps
    #[arg(long, value_name = "SECONDS")]
    pub step_delay: Option<f32>,

    /// Do not reload the graph when the input file changes
    #[arg(long)]
    pub no_watch: bool,

    /// Write the resolved settings to the settings file and exit
    #[arg(long)]
    pub save_config: bool,
}

impl Cli {
    /// Load the settings file and apply command line overrides
    pub fn resolve_settings(&self) -> Result<VisualizerSettings, SettingsError> {
        let mut settings = VisualizerSettings::load_or_default(&self.config)?;
        self.apply_overrides(&mut settings);
        Ok(settings)
    }

    fn apply_overrides(&self, settings: &mut VisualizerSettings) {
        if let Some(input) = &self.input {
            settings.input_path = input.clone();
        }
        if self.dfs {
            settings.initial_mode = SearchMode::Dfs;
        }
        if let Some(step_delay) = self.step_delay {
            settings.step_delay = step_delay;
        }
        if self.no_watch {
            settings.watch_input = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_settings_untouched() {
        let cli = Cli::parse_from(["node_traversal"]);
        assert_eq!(cli.config, PathBuf::from(SETTINGS_FILE_NAME));
        assert!(!cli.save_config);

        let mut settings = VisualizerSettings::default();
        cli.apply_overrides(&mut settings);
        assert_eq!(settings, VisualizerSettings::default());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "node_traversal",
            "graphs/maze.txt",
            "--dfs",
            "--step-delay",
            "0.5",
            "--no-watch",
        ]);
        let mut settings = VisualizerSettings::default();
        cli.apply_overrides(&mut settings);

        assert_eq!(settings.input_path, PathBuf::from("graphs/maze.txt"));
        assert_eq!(settings.initial_mode, SearchMode::Dfs);
        assert_eq!(settings.step_delay, 0.5);
        assert!(!settings.watch_input);
    }
}
