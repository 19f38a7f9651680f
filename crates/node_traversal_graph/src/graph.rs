// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph container owning every node.

use crate::node::{AnimationState, Node, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Id of the node every traversal and layout pass starts from
pub const START_NODE_ID: &str = "1";

/// Id of the search target whose path gets traced
pub const TERMINAL_NODE_ID: &str = "-1";

/// A directed graph keyed by string id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    /// Nodes by id; the map index is the node's [`NodeId`]
    nodes: IndexMap<String, Node>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node by id, creating it if it does not exist yet
    pub fn get_or_insert(&mut self, id: &str) -> NodeId {
        if let Some(index) = self.nodes.get_index_of(id) {
            return NodeId(index);
        }
        let (index, _) = self.nodes.insert_full(id.to_string(), Node::new(id));
        NodeId(index)
    }

    /// Add a directed edge. Self-loops and parallel edges are kept.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        if to.index() >= self.nodes.len() {
            return Err(GraphError::InvalidHandle(to));
        }
        let source = self.node_mut(from).ok_or(GraphError::InvalidHandle(from))?;
        source.add_neighbor(to);
        Ok(())
    }

    /// Find a node handle by id
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.nodes.get_index_of(id).map(NodeId)
    }

    /// Find a node handle by id, failing if it is absent
    pub fn require(&self, id: &str) -> Result<NodeId, GraphError> {
        self.find(id).ok_or_else(|| GraphError::MissingNode(id.to_string()))
    }

    /// Get a node by handle
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get_index(node_id.index()).map(|(_, node)| node)
    }

    /// Get a mutable node by handle
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_index_mut(node_id.index()).map(|(_, node)| node)
    }

    /// Get a node by id
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all nodes together with their handles
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.values().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Get all node handles
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of edges, counting parallel edges separately
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.neighbors().len()).sum()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Neighbor handles of a node, empty for an unknown handle
    pub fn neighbors(&self, node_id: NodeId) -> &[NodeId] {
        self.node(node_id).map(Node::neighbors).unwrap_or(&[])
    }

    /// Id string of a node
    pub fn id_of(&self, node_id: NodeId) -> Option<&str> {
        self.node(node_id).map(|n| n.id.as_str())
    }

    /// Set the animation state of a node
    pub fn set_state(&mut self, node_id: NodeId, state: AnimationState) {
        if let Some(node) = self.node_mut(node_id) {
            node.state = state;
        }
    }

    /// Put every node back to [`AnimationState::Unvisited`]
    pub fn reset_states(&mut self) {
        for node in self.nodes.values_mut() {
            node.state = AnimationState::Unvisited;
        }
    }

    /// Forget every assigned position
    pub fn clear_positions(&mut self) {
        for node in self.nodes.values_mut() {
            node.position = None;
        }
    }

    /// Handle of the start node, if the graph declares one
    pub fn start_node(&self) -> Option<NodeId> {
        self.find(START_NODE_ID)
    }

    /// Handle of the terminal node, if the graph declares one
    pub fn terminal_node(&self) -> Option<NodeId> {
        self.find(TERMINAL_NODE_ID)
    }

    /// Handles of every node currently in the given state
    pub fn nodes_in_state(&self, state: AnimationState) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.state == state)
            .map(|(id, _)| id)
            .collect()
    }
}

/// Error when looking up graph nodes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// No node with this id
    #[error("Node `{0}` not found in graph")]
    MissingNode(String),

    /// Handle does not belong to this graph
    #[error("Invalid node handle: {0:?}")]
    InvalidHandle(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_insert_is_stable() {
        let mut graph = Graph::new();
        let a = graph.get_or_insert("a");
        let b = graph.get_or_insert("b");
        assert_ne!(a, b);
        assert_eq!(graph.get_or_insert("a"), a);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.id_of(b), Some("b"));
    }

    #[test]
    fn test_edges_allow_self_loops_and_duplicates() {
        let mut graph = Graph::new();
        let a = graph.get_or_insert("a");
        let b = graph.get_or_insert("b");
        graph.add_edge(a, a).unwrap();
        graph.add_edge(a, b).unwrap();
        graph.add_edge(a, b).unwrap();
        assert_eq!(graph.neighbors(a), &[a, b, b]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_add_edge_rejects_foreign_handle() {
        let mut graph = Graph::new();
        let a = graph.get_or_insert("a");
        assert_eq!(
            graph.add_edge(a, NodeId(5)),
            Err(GraphError::InvalidHandle(NodeId(5)))
        );
    }

    #[test]
    fn test_require_reports_missing_id() {
        let graph = Graph::new();
        let err = graph.require(START_NODE_ID).unwrap_err();
        assert_eq!(err, GraphError::MissingNode("1".to_string()));
        assert_eq!(err.to_string(), "Node `1` not found in graph");
    }

    #[test]
    fn test_reset_states() {
        let mut graph = Graph::new();
        let a = graph.get_or_insert("a");
        let b = graph.get_or_insert("b");
        graph.set_state(a, AnimationState::Path);
        graph.set_state(b, AnimationState::Visiting);
        graph.reset_states();
        assert_eq!(graph.nodes_in_state(AnimationState::Unvisited), vec![a, b]);
    }
}
