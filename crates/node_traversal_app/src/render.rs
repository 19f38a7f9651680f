// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drawing of the search graph.
//!
//! Features:
//! - Directed edges trimmed to the node rim, with arrowheads
//! - Nodes coloured by animation state
//! - Pan (drag) and zoom (scroll) navigation

use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke, Vec2};
use node_traversal_graph::AnimationState;
use node_traversal_playback::{NodeView, SearchSession};

/// Node visual dimensions
const NODE_RADIUS: f32 = 20.0;
const LABEL_SIZE: f32 = 18.0;

/// Edge visual parameters
const EDGE_THICKNESS: f32 = 1.5;
const ARROW_LENGTH: f32 = 9.0;

/// Label drawn instead of the terminal node's id
const TERMINAL_LABEL: &str = "End";

/// Fill colour for a node
pub fn state_color(state: AnimationState, is_terminal: bool) -> Color32 {
    match state {
        AnimationState::Path => Color32::from_rgb(0, 228, 48),
        _ if is_terminal => Color32::from_rgb(230, 41, 55),
        AnimationState::Unvisited => Color32::from_rgb(130, 130, 130),
        AnimationState::Visiting => Color32::from_rgb(253, 249, 0),
        AnimationState::Visited => Color32::from_rgb(255, 161, 0),
    }
}

/// Text shown inside a node
pub fn node_label<'a>(view: &NodeView<'a>) -> &'a str {
    if view.is_terminal {
        TERMINAL_LABEL
    } else {
        view.id
    }
}

/// Endpoints of an edge between two node centres, pulled in by the radius.
///
/// `None` for coincident centres (self-loops).
fn edge_endpoints(from: Pos2, to: Pos2, radius: f32) -> Option<(Pos2, Pos2)> {
    let direction = to - from;
    if direction.length() <= f32::EPSILON {
        return None;
    }
    let offset = direction.normalized() * radius;
    Some((from + offset, to - offset))
}

/// Graph view state
pub struct GraphView {
    /// Current pan offset (screen space)
    pub pan: Vec2,
    /// Current zoom level
    pub zoom: f32,
}

impl GraphView {
    /// Create a new graph view
    pub fn new() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }

    /// Convert graph position to screen position
    pub fn graph_to_screen(&self, graph_pos: [f32; 2], rect: Rect) -> Pos2 {
        rect.min + Vec2::new(graph_pos[0], graph_pos[1]) * self.zoom + self.pan
    }

    /// Reset pan and zoom
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Render the graph
    pub fn ui(&mut self, ui: &mut egui::Ui, session: &SearchSession) {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.handle_input(ui, &response, rect);

        let views: Vec<NodeView<'_>> = session
            .node_views()
            .filter(|v| !v.id.is_empty() && v.position.is_some())
            .collect();

        // Edges first so nodes cover their ends
        for view in &views {
            self.draw_edges(&painter, rect, view);
        }
        for view in &views {
            self.draw_node(&painter, rect, view);
        }
    }

    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response, rect: Rect) {
        if response.dragged() {
            self.pan += response.drag_delta();
        }
        if response.double_clicked() {
            self.reset();
        }

        let Some(mouse_pos) = response.hover_pos() else {
            return;
        };
        let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);
        if scroll_delta != 0.0 {
            let old_zoom = self.zoom;
            self.zoom = (self.zoom * (1.0 + scroll_delta * 0.001)).clamp(0.25, 4.0);

            // Keep the point under the cursor fixed
            let anchor = mouse_pos - rect.min - self.pan;
            self.pan -= anchor * (self.zoom / old_zoom - 1.0);
        }
    }

    fn draw_edges(&self, painter: &egui::Painter, rect: Rect, view: &NodeView<'_>) {
        let Some(position) = view.position else {
            return;
        };
        let from = self.graph_to_screen(position, rect);
        let radius = NODE_RADIUS * self.zoom;
        let stroke = Stroke::new(EDGE_THICKNESS, Color32::BLACK);

        for &target in &view.neighbor_positions {
            let to = self.graph_to_screen(target, rect);
            let Some((start, end)) = edge_endpoints(from, to, radius) else {
                continue;
            };
            painter.line_segment([start, end], stroke);

            let back = (start - end).normalized() * ARROW_LENGTH * self.zoom;
            let side = back.rot90() * 0.5;
            painter.line_segment([end, end + back + side], stroke);
            painter.line_segment([end, end + back - side], stroke);
        }
    }

    fn draw_node(&self, painter: &egui::Painter, rect: Rect, view: &NodeView<'_>) {
        let Some(position) = view.position else {
            return;
        };
        let center = self.graph_to_screen(position, rect);
        let radius = NODE_RADIUS * self.zoom;

        painter.circle_filled(center, radius, state_color(view.state, view.is_terminal));
        painter.circle_stroke(center, radius, Stroke::new(1.0, Color32::from_gray(40)));
        painter.text(
            center,
            Align2::CENTER_CENTER,
            node_label(view),
            FontId::proportional(LABEL_SIZE * self.zoom),
            Color32::BLACK,
        );
    }
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_colors_are_distinct() {
        let colors = [
            state_color(AnimationState::Unvisited, false),
            state_color(AnimationState::Visiting, false),
            state_color(AnimationState::Visited, false),
            state_color(AnimationState::Path, false),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_terminal_is_red_until_on_path() {
        let red = state_color(AnimationState::Unvisited, true);
        assert_eq!(state_color(AnimationState::Visited, true), red);
        assert_eq!(
            state_color(AnimationState::Path, true),
            state_color(AnimationState::Path, false)
        );
    }

    #[test]
    fn test_edge_endpoints_trimmed_by_radius() {
        let (start, end) = edge_endpoints(Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0), 20.0).unwrap();
        assert_eq!(start, Pos2::new(20.0, 0.0));
        assert_eq!(end, Pos2::new(80.0, 0.0));
        assert!(edge_endpoints(Pos2::new(5.0, 5.0), Pos2::new(5.0, 5.0), 20.0).is_none());
    }

    #[test]
    fn test_graph_to_screen() {
        let mut view = GraphView::new();
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(500.0, 500.0));
        assert_eq!(view.graph_to_screen([50.0, 125.0], rect), Pos2::new(60.0, 145.0));
        view.zoom = 2.0;
        view.pan = Vec2::new(-5.0, 0.0);
        assert_eq!(view.graph_to_screen([50.0, 125.0], rect), Pos2::new(105.0, 270.0));
    }

    #[test]
    fn test_terminal_label() {
        let view = NodeView {
            id: "-1",
            position: None,
            state: AnimationState::Unvisited,
            is_terminal: true,
            neighbor_positions: Vec::new(),
        };
        assert_eq!(node_label(&view), "End");
    }
}
