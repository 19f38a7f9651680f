// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the traversal graph.

use serde::{Deserialize, Serialize};

/// Handle to a node owned by a [`crate::Graph`].
///
/// The wrapped value is the node's insertion index. It does not own the node
/// and is only meaningful for the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Index of the node inside its graph
    pub fn index(self) -> usize {
        self.0
    }
}

/// Presentation phase of a node during search playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimationState {
    /// Not reached yet in the current run
    #[default]
    Unvisited,
    /// The node the playback is currently on
    Visiting,
    /// Already stepped past
    Visited,
    /// Lies on the reconstructed path to the terminal node
    Path,
}

impl AnimationState {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            AnimationState::Unvisited => "Unvisited",
            AnimationState::Visiting => "Visiting",
            AnimationState::Visited => "Visited",
            AnimationState::Path => "Path",
        }
    }
}

/// A vertex in the directed graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique string id from the input file
    pub id: String,
    /// Outgoing edges in declaration order (duplicates kept)
    neighbors: Vec<NodeId>,
    /// Position assigned by layout, `None` while unplaced
    pub position: Option<[f32; 2]>,
    /// Current animation state
    pub state: AnimationState,
}

impl Node {
    /// Create a node with no edges, no position and the default state
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            neighbors: Vec::new(),
            position: None,
            state: AnimationState::Unvisited,
        }
    }

    /// Append an outgoing edge
    pub fn add_neighbor(&mut self, target: NodeId) {
        self.neighbors.push(target);
    }

    /// Outgoing edges in declaration order
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    /// Set the position
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Some([x, y]);
    }

    /// Whether layout has placed this node
    pub fn is_positioned(&self) -> bool {
        self.position.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_defaults() {
        let node = Node::new("7");
        assert_eq!(node.id, "7");
        assert!(node.neighbors().is_empty());
        assert!(!node.is_positioned());
        assert_eq!(node.state, AnimationState::Unvisited);
    }

    #[test]
    fn test_neighbors_keep_duplicates() {
        let mut node = Node::new("a");
        node.add_neighbor(NodeId(1));
        node.add_neighbor(NodeId(1));
        node.add_neighbor(NodeId(0));
        assert_eq!(node.neighbors(), &[NodeId(1), NodeId(1), NodeId(0)]);
    }
}
