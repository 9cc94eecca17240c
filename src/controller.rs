//! Playback controller: drives the engine and keeps the player model in sync.
//!
//! Global commands from the UI are resolved to `(segment, offset)` and sent to
//! the engine as local load/seek commands; local engine events are folded back
//! into the model. Engine events from superseded loads are dropped using a
//! per-load generation counter.

mod playback;
mod state;

pub use playback::*;
pub use state::*;
