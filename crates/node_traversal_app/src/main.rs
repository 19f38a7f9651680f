// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node Traversal - animated BFS/DFS visualizer
//!
//! Loads a directed graph from an adjacency file, lays it out by BFS level
//! and animates a breadth-first or depth-first search from node `1`,
//! highlighting the discovered path to node `-1`.
//!
//! ## Architecture
//!
//! The search itself lives in `node_traversal_graph` and
//! `node_traversal_playback`; this binary only owns the window, draws the
//! session each frame with egui, and turns button presses into session
//! commands.

mod app;
mod cli;
mod file_watcher;
mod panel;
mod render;
mod settings;

use app::VisualizerApp;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str =
    "node_traversal_app=debug,node_traversal_graph=info,node_traversal_playback=info,wgpu=warn,naga=warn";

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = cli::Cli::parse();

    tracing::info!("Starting Node Traversal v{}", env!("CARGO_PKG_VERSION"));

    let result = cli
        .resolve_settings()
        .map_err(app::AppError::from)
        .and_then(|settings| {
            if cli.save_config {
                settings.save(&cli.config)?;
                tracing::info!("Wrote settings to {:?}", cli.config);
                return Ok(());
            }
            VisualizerApp::run(settings)
        });

    if let Err(e) = result {
        tracing::error!("Visualizer failed: {e}");
        std::process::exit(1);
    }
}
