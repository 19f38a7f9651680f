// SPDX-License-Identifier: MIT OR Apache-2.0
//! Control panel: search mode, restart and playback status.

use node_traversal_playback::{PlaybackState, SearchSession, SessionCommand};

/// Width of the control side panel
const PANEL_WIDTH: f32 = 190.0;

/// Range of the step delay slider, in seconds
const STEP_DELAY_RANGE: std::ops::RangeInclusive<f32> = 0.02..=2.0;

/// Keyboard shortcuts mapped to commands
pub fn shortcut_commands(ctx: &egui::Context) -> Vec<SessionCommand> {
    ctx.input(|i| {
        let mut commands = Vec::new();
        if i.key_pressed(egui::Key::M) {
            commands.push(SessionCommand::ToggleMode);
        }
        if i.key_pressed(egui::Key::R) {
            commands.push(SessionCommand::Restart);
        }
        commands
    })
}

/// Status line describing playback progress
pub fn status_text(session: &SearchSession) -> String {
    let playback = session.playback();
    let total = session.traversal().len();
    match playback.state() {
        PlaybackState::Done if playback.traced_path().is_empty() => {
            format!("Done: {total} steps, terminal not reached")
        }
        PlaybackState::Done => format!(
            "Done: {total} steps, path of {} nodes",
            playback.traced_path().len()
        ),
        state => format!("{}: step {}/{}", state.name(), playback.step_index(), total),
    }
}

/// Side panel with the search controls
pub struct ControlPanel {
    /// Step delay being edited
    step_delay: f32,
}

impl ControlPanel {
    /// Create a new control panel
    pub fn new(step_delay: f32) -> Self {
        Self { step_delay }
    }

    /// Draw the panel and return the commands it produced.
    ///
    /// The step delay is applied directly since it does not restart the run.
    pub fn ui(&mut self, ctx: &egui::Context, session: &mut SearchSession) -> Vec<SessionCommand> {
        let mut commands = Vec::new();

        egui::SidePanel::right("search_controls")
            .resizable(false)
            .exact_width(PANEL_WIDTH)
            .show(ctx, |ui| {
                ui.heading("Search");
                ui.add_space(4.0);

                let mode_label = format!("Mode: {}", session.mode().label());
                if ui
                    .add_sized([PANEL_WIDTH - 16.0, 30.0], egui::Button::new(mode_label))
                    .on_hover_text("Switch BFS/DFS (M)")
                    .clicked()
                {
                    commands.push(SessionCommand::ToggleMode);
                }
                if ui
                    .add_sized([PANEL_WIDTH - 16.0, 30.0], egui::Button::new("Restart Search"))
                    .on_hover_text("Restart (R)")
                    .clicked()
                {
                    commands.push(SessionCommand::Restart);
                }

                ui.separator();
                ui.label("Step delay");
                if ui
                    .add(egui::Slider::new(&mut self.step_delay, STEP_DELAY_RANGE).suffix(" s"))
                    .changed()
                {
                    session.playback_mut().set_step_delay(self.step_delay);
                }

                ui.separator();
                ui.label(status_text(session));
                ui.add(egui::ProgressBar::new(session.playback().progress(session.traversal())));
                ui.label(format!(
                    "Nodes: {} | Edges: {}",
                    session.graph().node_count(),
                    session.graph().edge_count()
                ));
            });

        commands
    }
}
