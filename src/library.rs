//! Book loading: turns a directory of audio files into timeline segments.

mod model;
mod scan;

pub use model::*;
pub use scan::load_book;
