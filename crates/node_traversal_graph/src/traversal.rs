// SPDX-License-Identifier: MIT OR Apache-2.0
//! Breadth-first and depth-first step-sequence builders.
//!
//! A search run produces a [`Traversal`]: the order in which nodes are
//! visited plus a parent map used afterwards to reconstruct the path to the
//! terminal node. Runs are computed eagerly; playback only paces how the
//! steps are consumed.

use crate::graph::Graph;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Maps a visited node to the node that discovered it (`None` for the start)
pub type ParentMap = HashMap<NodeId, Option<NodeId>>;

/// Which search algorithm produces the step sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SearchMode {
    /// Breadth-first search
    #[default]
    Bfs,
    /// Depth-first search
    Dfs,
}

impl SearchMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            SearchMode::Bfs => SearchMode::Dfs,
            SearchMode::Dfs => SearchMode::Bfs,
        }
    }

    /// Short label for buttons and logs
    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::Bfs => "BFS",
            SearchMode::Dfs => "DFS",
        }
    }
}

/// Visit order and discovery parents of one search run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traversal {
    steps: Vec<NodeId>,
    parents: ParentMap,
}

impl Traversal {
    /// Nodes in visit order
    pub fn steps(&self) -> &[NodeId] {
        &self.steps
    }

    /// Parent map of this run
    pub fn parents(&self) -> &ParentMap {
        &self.parents
    }

    /// Discovery parent of a visited node.
    ///
    /// `None` both for the start node and for nodes this run never reached.
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(&node).copied().flatten()
    }

    /// Whether the run visited this node
    pub fn contains(&self, node: NodeId) -> bool {
        self.parents.contains_key(&node)
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the run produced no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Path from the start node to `target` following the parent map.
    ///
    /// Empty if the run never reached `target`.
    pub fn path_to(&self, target: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        if !self.contains(target) {
            return path;
        }

        let mut current = Some(target);
        while let Some(node) = current {
            path.push(node);
            // Parents are always visited before their children, so the chain
            // ends at the start node within `parents.len()` hops.
            if path.len() > self.parents.len() {
                break;
            }
            current = self.parent_of(node);
        }
        path.reverse();
        path
    }
}

/// Queue-based breadth-first step builder.
///
/// Nodes come out in non-decreasing distance from `start`; nodes at the same
/// distance keep their discovery order.
pub fn build_bfs_steps(graph: &Graph, start: NodeId) -> Traversal {
    let mut traversal = Traversal::default();
    if graph.node(start).is_none() {
        return traversal;
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    visited.insert(start);
    traversal.parents.insert(start, None);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        traversal.steps.push(current);

        for &neighbor in graph.neighbors(current) {
            if visited.insert(neighbor) {
                traversal.parents.insert(neighbor, Some(current));
                queue.push_back(neighbor);
            }
        }
    }

    traversal
}

/// Stack-based depth-first step builder.
///
/// Neighbors are pushed in reverse so they pop in declared order. A node may
/// be pushed several times; only its first pop is a visit.
///
/// Parents are stamped when a node is first *pushed*, not when it is
/// visited. If `a` pushes `c` and a later-visited sibling `b` also pushes
/// `c`, the step sequence reaches `c` through `b` but the recorded parent
/// stays `a`. This decides which path gets highlighted and is kept as is.
pub fn build_dfs_steps(graph: &Graph, start: NodeId) -> Traversal {
    let mut traversal = Traversal::default();
    if graph.node(start).is_none() {
        return traversal;
    }

    let mut visited = HashSet::new();
    let mut stack = vec![start];
    traversal.parents.insert(start, None);

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        traversal.steps.push(current);

        for &neighbor in graph.neighbors(current).iter().rev() {
            if !visited.contains(&neighbor) {
                stack.push(neighbor);
                traversal.parents.entry(neighbor).or_insert(Some(current));
            }
        }
    }

    traversal
}

/// Reset every node to unvisited and compute a fresh run
pub fn run_search(graph: &mut Graph, start: NodeId, mode: SearchMode) -> Traversal {
    graph.reset_states();
    let traversal = match mode {
        SearchMode::Bfs => build_bfs_steps(graph, start),
        SearchMode::Dfs => build_dfs_steps(graph, start),
    };
    tracing::debug!("{} run produced {} steps", mode.label(), traversal.len());
    traversal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_from_str;
    use crate::node::AnimationState;

    const SCENARIO: &str = "1 - > 2, 3\n2 - > -1\n3 - > nothing\n-1 - > nothing";

    fn ids(graph: &Graph, nodes: &[NodeId]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| graph.id_of(*n).unwrap().to_string())
            .collect()
    }

    fn parent_id<'a>(graph: &'a Graph, traversal: &Traversal, id: &str) -> Option<&'a str> {
        let node = graph.find(id).unwrap();
        traversal.parent_of(node).and_then(|p| graph.id_of(p))
    }

    /// Directed BFS distances, computed independently of the builders
    fn distances(graph: &Graph, start: NodeId) -> HashMap<NodeId, usize> {
        let mut dist = HashMap::from([(start, 0)]);
        let mut frontier = vec![start];
        let mut depth = 0;
        while !frontier.is_empty() {
            depth += 1;
            let mut next = Vec::new();
            for node in frontier {
                for &n in graph.neighbors(node) {
                    if !dist.contains_key(&n) {
                        dist.insert(n, depth);
                        next.push(n);
                    }
                }
            }
            frontier = next;
        }
        dist
    }

    #[test]
    fn test_toggled_mode() {
        assert_eq!(SearchMode::Bfs.toggled(), SearchMode::Dfs);
        assert_eq!(SearchMode::Bfs.toggled().toggled(), SearchMode::Bfs);
        assert_eq!(SearchMode::default(), SearchMode::Bfs);
    }

    #[test]
    fn test_bfs_scenario() {
        let graph = load_from_str(SCENARIO);
        let start = graph.require("1").unwrap();
        let t = build_bfs_steps(&graph, start);

        assert_eq!(ids(&graph, t.steps()), vec!["1", "2", "3", "-1"]);
        assert_eq!(parent_id(&graph, &t, "2"), Some("1"));
        assert_eq!(parent_id(&graph, &t, "3"), Some("1"));
        assert_eq!(parent_id(&graph, &t, "-1"), Some("2"));
        assert_eq!(t.parents().get(&start), Some(&None));
    }

    #[test]
    fn test_dfs_scenario() {
        let graph = load_from_str(SCENARIO);
        let start = graph.require("1").unwrap();
        let t = build_dfs_steps(&graph, start);

        assert_eq!(ids(&graph, t.steps()), vec!["1", "2", "-1", "3"]);
        assert_eq!(parent_id(&graph, &t, "2"), Some("1"));
        assert_eq!(parent_id(&graph, &t, "-1"), Some("2"));
        assert_eq!(parent_id(&graph, &t, "3"), Some("1"));
    }

    #[test]
    fn test_path_to_terminal() {
        let graph = load_from_str(SCENARIO);
        let start = graph.require("1").unwrap();
        let terminal = graph.require("-1").unwrap();
        for t in [build_bfs_steps(&graph, start), build_dfs_steps(&graph, start)] {
            assert_eq!(ids(&graph, &t.path_to(terminal)), vec!["1", "2", "-1"]);
        }
    }

    #[test]
    fn test_dfs_parent_is_stamped_on_first_push() {
        // 3 is visited below 2, but 1 pushed it first
        let graph = load_from_str("1 - > 2, 3\n2 - > 3");
        let start = graph.require("1").unwrap();
        let t = build_dfs_steps(&graph, start);

        assert_eq!(ids(&graph, t.steps()), vec!["1", "2", "3"]);
        assert_eq!(parent_id(&graph, &t, "3"), Some("1"));
    }

    #[test]
    fn test_cycles_and_self_loops_terminate() {
        let graph = load_from_str("1 - > 2, 1\n2 - > 3, 2\n3 - > 1, 2");
        let start = graph.require("1").unwrap();
        assert_eq!(ids(&graph, build_bfs_steps(&graph, start).steps()), vec!["1", "2", "3"]);
        assert_eq!(ids(&graph, build_dfs_steps(&graph, start).steps()), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_steps_cover_exactly_the_reachable_set() {
        let graph = load_from_str(
            "1 - > 2, 3\n2 - > 4\n3 - > 4, 5\n4 - > 1\n9 - > 1, 10\n10 - > 9\n5 - > nothing",
        );
        let start = graph.require("1").unwrap();
        let reachable: HashSet<NodeId> = distances(&graph, start).into_keys().collect();

        for t in [build_bfs_steps(&graph, start), build_dfs_steps(&graph, start)] {
            let stepped: HashSet<NodeId> = t.steps().iter().copied().collect();
            assert_eq!(stepped.len(), t.len(), "node stepped twice");
            assert_eq!(stepped, reachable);
            let parented: HashSet<NodeId> = t.parents().keys().copied().collect();
            assert_eq!(parented, reachable);
            assert!(!t.contains(graph.require("9").unwrap()));
        }
    }

    #[test]
    fn test_bfs_distance_is_non_decreasing() {
        let graph = load_from_str("1 - > 5, 2\n5 - > 6\n2 - > 3, 6\n3 - > 4\n6 - > 4, 1");
        let start = graph.require("1").unwrap();
        let dist = distances(&graph, start);
        let t = build_bfs_steps(&graph, start);
        let depths: Vec<usize> = t.steps().iter().map(|n| dist[n]).collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]), "{depths:?}");
    }

    #[test]
    fn test_dfs_starts_with_start_node() {
        let graph = load_from_str("1 - > 3\n3 - > 1, 2\n2 - > 1");
        let start = graph.require("1").unwrap();
        assert_eq!(build_dfs_steps(&graph, start).steps().first(), Some(&start));
    }

    #[test]
    fn test_run_search_resets_states_and_is_deterministic() {
        let mut graph = load_from_str(SCENARIO);
        let start = graph.require("1").unwrap();
        for node in graph.node_ids().collect::<Vec<_>>() {
            graph.set_state(node, AnimationState::Path);
        }

        let first = run_search(&mut graph, start, SearchMode::Dfs);
        assert_eq!(graph.nodes_in_state(AnimationState::Unvisited).len(), 4);
        let second = run_search(&mut graph, start, SearchMode::Dfs);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unreached_target_has_empty_path() {
        let graph = load_from_str("1 - > 2\n-1 - > 1");
        let start = graph.require("1").unwrap();
        let terminal = graph.require("-1").unwrap();
        assert!(build_bfs_steps(&graph, start).path_to(terminal).is_empty());
    }
}
