//! Engine host: the process-side media engine the controller drives.
//!
//! The controller only ever talks to it through `EngineCmd` messages and
//! hears back through `EngineEvent`s; decoding and output stay in here.

mod clock;
mod host;
mod sink;
mod thread;
mod types;

pub use host::EngineHost;
pub use types::*;

#[cfg(test)]
mod tests;
