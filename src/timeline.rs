//! Virtual timeline over an ordered list of audio segments.
//!
//! A book is split into several files; this module presents them as one
//! continuous timeline and converts between global seconds and
//! `(segment index, local offset)` pairs. Nothing in here performs I/O.

mod format;
mod model;
mod segment;

pub use format::format_seconds;
pub use model::*;
pub use segment::*;
