// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timed consumption of a search run.

use node_traversal_graph::{AnimationState, Graph, NodeId, Traversal};

/// Default time between two steps, in seconds
pub const DEFAULT_STEP_DELAY: f32 = 0.2;

/// Smallest accepted step delay
const MIN_STEP_DELAY: f32 = 0.01;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No step consumed yet
    #[default]
    Idle,
    /// Stepping through the sequence
    Advancing,
    /// Sequence exhausted, path not yet traced
    PathTracing,
    /// Run finished
    Done,
}

impl PlaybackState {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "Idle",
            PlaybackState::Advancing => "Advancing",
            PlaybackState::PathTracing => "Tracing path",
            PlaybackState::Done => "Done",
        }
    }
}

/// Steps through a [`Traversal`] one node per elapsed delay.
///
/// Exactly one node is [`AnimationState::Visiting`] while advancing; every
/// node stepped before it is [`AnimationState::Visited`]. After the last
/// step the parent chain of the terminal node is overlaid with
/// [`AnimationState::Path`].
#[derive(Debug, Clone)]
pub struct PlaybackController {
    state: PlaybackState,
    /// Time accumulated since the last step
    elapsed: f32,
    /// Time between steps
    step_delay: f32,
    /// Number of steps consumed
    step_index: usize,
    /// Whether the path overlay has been applied this run
    path_traced: bool,
    /// Nodes overlaid with the path, start first
    traced_path: Vec<NodeId>,
}

impl PlaybackController {
    /// Create a new playback controller
    pub fn new(step_delay: f32) -> Self {
        Self {
            state: PlaybackState::Idle,
            elapsed: 0.0,
            step_delay: step_delay.max(MIN_STEP_DELAY),
            step_index: 0,
            path_traced: false,
            traced_path: Vec::new(),
        }
    }

    /// Advance playback by `delta` seconds
    pub fn update(
        &mut self,
        delta: f32,
        graph: &mut Graph,
        traversal: &Traversal,
    ) -> PlaybackState {
        match self.state {
            PlaybackState::Idle | PlaybackState::Advancing => {
                self.elapsed += delta.max(0.0);
                self.advance(graph, traversal);
            }
            PlaybackState::PathTracing => self.trace_path(graph, traversal),
            PlaybackState::Done => {}
        }
        self.state
    }

    fn advance(&mut self, graph: &mut Graph, traversal: &Traversal) {
        let steps = traversal.steps();

        if self.step_index >= steps.len() {
            self.state = PlaybackState::PathTracing;
            return;
        }
        if self.elapsed < self.step_delay {
            return;
        }

        let node = steps[self.step_index];
        graph.set_state(node, AnimationState::Visiting);
        if let Some(previous) = self.step_index.checked_sub(1).map(|i| steps[i]) {
            graph.set_state(previous, AnimationState::Visited);
        }
        tracing::trace!(step = self.step_index, node = graph.id_of(node), "Step");

        self.step_index += 1;
        self.elapsed = 0.0;
        self.state = if self.step_index == steps.len() {
            PlaybackState::PathTracing
        } else {
            PlaybackState::Advancing
        };
    }

    fn trace_path(&mut self, graph: &mut Graph, traversal: &Traversal) {
        if let Some(last) = self.current(traversal) {
            graph.set_state(last, AnimationState::Visited);
        }

        if !self.path_traced {
            self.path_traced = true;
            self.traced_path = graph
                .terminal_node()
                .map(|terminal| traversal.path_to(terminal))
                .unwrap_or_default();

            for &node in &self.traced_path {
                graph.set_state(node, AnimationState::Path);
            }

            if self.traced_path.is_empty() {
                tracing::info!("Search finished without reaching the terminal node");
            } else {
                tracing::info!("Traced path of {} nodes to the terminal node", self.traced_path.len());
            }
        }

        self.state = PlaybackState::Done;
    }

    /// Return to the initial state for a fresh run
    pub fn reset(&mut self) {
        self.state = PlaybackState::Idle;
        self.elapsed = 0.0;
        self.step_index = 0;
        self.path_traced = false;
        self.traced_path.clear();
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Number of steps consumed so far
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Most recently stepped node
    pub fn current(&self, traversal: &Traversal) -> Option<NodeId> {
        self.step_index
            .checked_sub(1)
            .and_then(|i| traversal.steps().get(i).copied())
    }

    /// Fraction of the run consumed, in `0.0..=1.0`
    pub fn progress(&self, traversal: &Traversal) -> f32 {
        if traversal.is_empty() {
            1.0
        } else {
            self.step_index as f32 / traversal.len() as f32
        }
    }

    /// Whether the run has finished
    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Done
    }

    /// Whether the path overlay has been applied
    pub fn path_traced(&self) -> bool {
        self.path_traced
    }

    /// Nodes overlaid with the path, start first
    pub fn traced_path(&self) -> &[NodeId] {
        &self.traced_path
    }

    /// Time between steps
    pub fn step_delay(&self) -> f32 {
        self.step_delay
    }

    /// Set time between steps
    pub fn set_step_delay(&mut self, step_delay: f32) {
        self.step_delay = step_delay.max(MIN_STEP_DELAY);
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DELAY)
    }
}
