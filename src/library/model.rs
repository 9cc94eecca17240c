use std::path::PathBuf;

use thiserror::Error;

use crate::timeline::Segment;

/// One audiobook: an ordered list of segments.
#[derive(Debug, Clone)]
pub struct Book {
    pub work_id: String,
    pub title: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error("failed to read {path:?}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("no audio files found in {0:?}")]
    NoAudioFiles(PathBuf),
}
