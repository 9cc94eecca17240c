use std::path::PathBuf;
use std::time::Duration;

use serde::{Serialize, Serializer};

/// A chapter inside one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chapter {
    pub title: Option<String>,
    #[serde(serialize_with = "as_secs")]
    pub length: Duration,
}

impl Chapter {
    pub fn new(title: Option<String>, length: Duration) -> Self {
        Self { title, length }
    }
}

/// One playable file of the book.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Locator handed to the engine unchanged.
    #[serde(rename = "path")]
    pub source: PathBuf,
    #[serde(serialize_with = "as_secs")]
    pub duration: Duration,
    pub chapters: Vec<Chapter>,
    pub track_title: Option<String>,
    pub track_author: Option<String>,
    pub album_title: Option<String>,
}

impl Segment {
    pub fn new(source: impl Into<PathBuf>, duration: Duration, chapters: Vec<Chapter>) -> Self {
        Self {
            source: source.into(),
            duration,
            chapters,
            track_title: None,
            track_author: None,
            album_title: None,
        }
    }
}

/// How `forward`/`backward` move through the book.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SkipMode {
    /// Move between files.
    PerFile,
    /// Move between chapters of a single-file book.
    PerChapter,
}

impl Default for SkipMode {
    fn default() -> Self {
        Self::PerFile
    }
}

impl SkipMode {
    /// Single-file books skip by chapter, everything else by file.
    pub fn for_segment_count(count: usize) -> Self {
        if count == 1 {
            Self::PerChapter
        } else {
            Self::PerFile
        }
    }
}

/// A chapter expressed as a percentage span of the whole book.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct OverlaySegment {
    pub start: f64,
    pub end: f64,
}

/// Seconds from the wire to a `Duration`. Negative and NaN become zero,
/// anything too large saturates.
pub fn duration_from_secs(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

fn as_secs<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}
