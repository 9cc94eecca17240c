//! Named-event/payload messages exchanged with the host process.
//!
//! Every message is one JSON object per line: `{"event": ..., "payload": ...}`.
//! `HostEvent` flows out of the player, `UiCommand` flows in.

mod payload;

pub use payload::*;

#[cfg(test)]
mod tests;
