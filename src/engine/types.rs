//! Engine command/event types.
//!
//! Every event carries the `generation` of the load it belongs to so the
//! controller can discard events that outlived a reload.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCmd {
    /// Replace the current source and position it at `position`.
    Load {
        generation: u64,
        index: usize,
        source: PathBuf,
        position: Duration,
        autoplay: bool,
    },
    Play,
    Pause,
    /// Seek inside the current source without reloading it on the controller side.
    Seek { position: Duration },
    SetVolume(f32),
    /// Stop and forget the current source.
    Unload,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Local position inside the segment loaded under `generation`.
    PositionTick {
        generation: u64,
        index: usize,
        position: Duration,
        duration: Option<Duration>,
    },
    /// The segment loaded under `generation` played to its end.
    Finished { generation: u64, index: usize },
}

impl EngineEvent {
    pub fn generation(&self) -> u64 {
        match self {
            Self::PositionTick { generation, .. } | Self::Finished { generation, .. } => *generation,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::PositionTick { index, .. } | Self::Finished { index, .. } => *index,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
    #[error("failed to open {path:?}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
}
