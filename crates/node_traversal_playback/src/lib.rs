// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step-by-step playback of graph searches.
//!
//! This crate turns a precomputed search run into an animation:
//! - A playback controller fed with elapsed time
//! - Moving "visiting" highlight across the step sequence
//! - Path overlay to the terminal node once the run is exhausted
//! - A session owning the graph that applies restart/mode commands

pub mod playback;
pub mod session;

pub use playback::{PlaybackController, PlaybackState, DEFAULT_STEP_DELAY};
pub use session::{NodeView, SearchSession, SessionCommand, SessionConfig, SessionError};
