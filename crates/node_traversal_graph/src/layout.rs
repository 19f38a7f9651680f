// SPDX-License-Identifier: MIT OR Apache-2.0
//! Level-based placement of nodes for drawing.

use crate::graph::Graph;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Placement constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// X of column zero
    pub base_x: f32,
    /// Y of level zero
    pub base_y: f32,
    /// Horizontal distance between columns
    pub spacing_x: f32,
    /// Vertical distance between levels
    pub spacing_y: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_x: 50.0,
            base_y: 50.0,
            spacing_x: 75.0,
            spacing_y: 75.0,
        }
    }
}

impl LayoutConfig {
    /// Position of a grid cell
    pub fn position(&self, column: usize, level: usize) -> [f32; 2] {
        [
            self.base_x + column as f32 * self.spacing_x,
            self.base_y + level as f32 * self.spacing_y,
        ]
    }
}

/// Place every node reachable from `root`.
///
/// Levels are BFS depths from the root; within a level nodes take columns
/// left to right in the order they are dequeued. A node is placed once, and
/// nodes the root cannot reach keep whatever position they had.
///
/// Returns the number of nodes placed.
pub fn assign_positions(graph: &mut Graph, root: NodeId, config: &LayoutConfig) -> usize {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    let mut level_count: Vec<usize> = Vec::new();
    let mut placed = 0;

    if graph.node(root).is_none() {
        return 0;
    }

    visited.insert(root);
    queue.push_back((root, 0usize));

    while let Some((node_id, level)) = queue.pop_front() {
        if level_count.len() <= level {
            level_count.resize(level + 1, 0);
        }
        let column = level_count[level];
        level_count[level] += 1;

        let [x, y] = config.position(column, level);
        if let Some(node) = graph.node_mut(node_id) {
            node.set_position(x, y);
            placed += 1;
        }

        for &neighbor in graph.neighbors(node_id) {
            if visited.insert(neighbor) {
                queue.push_back((neighbor, level + 1));
            }
        }
    }

    tracing::debug!("Placed {} of {} nodes across {} levels", placed, graph.node_count(), level_count.len());
    placed
}
