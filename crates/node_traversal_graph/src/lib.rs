// SPDX-License-Identifier: MIT OR Apache-2.0
//! Directed node graph for search visualization.
//!
//! This crate provides the data side of the traversal visualizer:
//! - Node/graph model with animation state per node
//! - Loader for the line-oriented `a - > b, c` adjacency format
//! - Level-based layout assignment
//! - BFS and DFS step-sequence builders with parent maps
//!
//! ## Architecture
//!
//! The graph owns every node in an insertion-ordered map. Neighbor lists,
//! step sequences and parent maps hold [`NodeId`] handles only, which are
//! stable because nodes are never removed while a graph lives.

pub mod node;
pub mod graph;
pub mod loader;
pub mod layout;
pub mod traversal;

pub use node::{AnimationState, Node, NodeId};
pub use graph::{Graph, GraphError, START_NODE_ID, TERMINAL_NODE_ID};
pub use loader::{load_from_path, load_from_str, try_load_from_path, LoadError};
pub use layout::{assign_positions, LayoutConfig};
pub use traversal::{build_bfs_steps, build_dfs_steps, run_search, ParentMap, SearchMode, Traversal};
