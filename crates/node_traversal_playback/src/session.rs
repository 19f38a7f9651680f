// SPDX-License-Identifier: MIT OR Apache-2.0
//! A search session: graph, current run and playback in one owner.
//!
//! The session is the only place that mutates the graph. Commands from the
//! input layer and elapsed time from the frame loop both go through it, and
//! renderers read snapshots via [`SearchSession::node_views`].

use crate::playback::{PlaybackController, PlaybackState, DEFAULT_STEP_DELAY};
use node_traversal_graph::{
    assign_positions, run_search, AnimationState, Graph, GraphError, LayoutConfig, NodeId,
    SearchMode, Traversal, START_NODE_ID, TERMINAL_NODE_ID,
};

/// Commands accepted from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Switch BFS/DFS and restart
    ToggleMode,
    /// Recompute the run with the current mode
    Restart,
    /// Use a specific mode and restart
    SetMode(SearchMode),
}

/// Session construction options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Mode of the first run
    pub mode: SearchMode,
    /// Time between playback steps
    pub step_delay: f32,
    /// Node placement
    pub layout: LayoutConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            step_delay: DEFAULT_STEP_DELAY,
            layout: LayoutConfig::default(),
        }
    }
}

/// Read-only snapshot of one node for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView<'a> {
    /// Node id
    pub id: &'a str,
    /// Assigned position, `None` if unplaced
    pub position: Option<[f32; 2]>,
    /// Animation state
    pub state: AnimationState,
    /// Whether this is the terminal node
    pub is_terminal: bool,
    /// Positions of the neighbors that have one, in declaration order
    pub neighbor_positions: Vec<[f32; 2]>,
}

/// Owns a graph and drives repeated search runs over it
#[derive(Debug)]
pub struct SearchSession {
    graph: Graph,
    start: NodeId,
    mode: SearchMode,
    layout: LayoutConfig,
    traversal: Traversal,
    playback: PlaybackController,
    runs: u64,
}

impl SearchSession {
    /// Lay out `graph` and compute the first run.
    ///
    /// Fails if the graph has no start node.
    pub fn new(graph: Graph, config: SessionConfig) -> Result<Self, SessionError> {
        let start = graph.require(START_NODE_ID)?;
        let mut session = Self {
            graph,
            start,
            mode: config.mode,
            layout: config.layout,
            traversal: Traversal::default(),
            playback: PlaybackController::new(config.step_delay),
            runs: 0,
        };
        session.relayout();
        session.restart();
        Ok(session)
    }

    fn relayout(&mut self) {
        self.graph.clear_positions();
        assign_positions(&mut self.graph, self.start, &self.layout);
    }

    /// Discard the current run and compute a new one with the current mode
    pub fn restart(&mut self) {
        self.traversal = run_search(&mut self.graph, self.start, self.mode);
        self.playback.reset();
        self.runs += 1;
        tracing::info!(
            "Search restarted: {} over {} nodes, {} steps",
            self.mode.label(),
            self.graph.node_count(),
            self.traversal.len()
        );
    }

    /// Switch between BFS and DFS and restart
    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Use `mode` and restart
    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
        self.restart();
    }

    /// Apply a command from the input layer
    pub fn apply(&mut self, command: SessionCommand) {
        tracing::debug!("Applying {:?}", command);
        match command {
            SessionCommand::ToggleMode => self.toggle_mode(),
            SessionCommand::Restart => self.restart(),
            SessionCommand::SetMode(mode) => self.set_mode(mode),
        }
    }

    /// Advance playback by `delta` seconds
    pub fn tick(&mut self, delta: f32) -> PlaybackState {
        self.playback.update(delta, &mut self.graph, &self.traversal)
    }

    /// Replace the graph, e.g. after the input file changed.
    ///
    /// On error the current graph and run are kept.
    pub fn replace_graph(&mut self, graph: Graph) -> Result<(), SessionError> {
        let start = graph.require(START_NODE_ID)?;
        self.graph = graph;
        self.start = start;
        self.relayout();
        self.restart();
        Ok(())
    }

    /// Change node placement and lay out again
    pub fn set_layout(&mut self, layout: LayoutConfig) {
        self.layout = layout;
        self.relayout();
    }

    /// The graph being searched
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Handle of the start node
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Current search mode
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Current node placement
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Current run
    pub fn traversal(&self) -> &Traversal {
        &self.traversal
    }

    /// Playback of the current run
    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// Mutable playback, for tuning the step delay
    pub fn playback_mut(&mut self) -> &mut PlaybackController {
        &mut self.playback
    }

    /// Number of runs started since creation
    pub fn run_count(&self) -> u64 {
        self.runs
    }

    /// Snapshot of every node for the renderer
    pub fn node_views(&self) -> impl Iterator<Item = NodeView<'_>> {
        self.graph.nodes().map(move |node| NodeView {
            id: &node.id,
            position: node.position,
            state: node.state,
            is_terminal: node.id == TERMINAL_NODE_ID,
            neighbor_positions: node
                .neighbors()
                .iter()
                .filter_map(|n| self.graph.node(*n).and_then(|n| n.position))
                .collect(),
        })
    }
}

/// Error when creating or updating a session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Graph is missing a required node
    #[error("Cannot start search: {0}")]
    Graph(#[from] GraphError),
}
