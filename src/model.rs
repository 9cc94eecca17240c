//! Player model module: the UI-facing state kept in sync with the engine.
//!
//! `PlayerModel` lives in `model::player` and wraps the timeline together with
//! volume, readiness and checkpoint state.

mod player;

pub use player::*;
