use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::timeline::{Chapter, Segment};

use super::model::{Book, LibraryError};

const LIBRARY_LOG_TARGET: &str = "bookline::library";

pub(super) fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Work ids only keep ASCII letters and digits; everything else becomes `_`.
pub(super) fn work_id_for(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Containers that may carry a chapter track.
const CHAPTER_TRACK_EXTENSIONS: [&str; 3] = ["mp4", "m4a", "m4b"];

fn tag_text(value: Option<Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn has_chapter_track(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| CHAPTER_TRACK_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read one file's duration, tags and chapters. Unreadable tags give a
/// zero-length segment with no chapters; the engine may still be able to play it.
fn read_segment(path: &Path) -> Segment {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            warn!(target: LIBRARY_LOG_TARGET, "no metadata for {:?}: {e}", path);
            return Segment::new(path, Duration::ZERO, Vec::new());
        }
    };

    let duration = tagged.properties().duration();
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag());
    let track_title = tag.and_then(|t| tag_text(t.title()));

    let mut chapters = Vec::new();
    if has_chapter_track(path) {
        match read_mp4_chapters(path, duration) {
            Ok(found) => chapters = found,
            Err(e) => warn!(target: LIBRARY_LOG_TARGET, "chapter track of {:?} unreadable: {e}", path),
        }
    }
    if chapters.is_empty() {
        chapters.push(Chapter::new(track_title.clone(), duration));
    }

    let mut segment = Segment::new(path, duration, chapters);
    segment.track_title = track_title;
    segment.track_author = tag.and_then(|t| tag_text(t.artist()));
    segment.album_title = tag.and_then(|t| tag_text(t.album()));
    segment
}

/// Chapters from the first text track of an MP4 container. An empty list
/// means the file has no chapter track.
///
/// A sample duration of 0 runs to the end of the file.
pub(super) fn read_mp4_chapters(
    path: &Path,
    file_duration: Duration,
) -> Result<Vec<Chapter>, mp4::Error> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let mut reader = mp4::Mp4Reader::read_header(BufReader::new(file), size)?;

    let Some((track_id, timescale, sample_count)) = reader
        .tracks()
        .values()
        .find(|t| is_chapter_track(t))
        .map(|t| (t.track_id(), t.timescale(), t.sample_count()))
    else {
        return Ok(Vec::new());
    };

    let timescale = u64::from(timescale.max(1));
    let mut chapters = Vec::with_capacity(sample_count as usize);
    for sample_id in 1..=sample_count {
        let Some(sample) = reader.read_sample(track_id, sample_id)? else {
            break;
        };
        let length = if sample.duration == 0 {
            file_duration.saturating_sub(ticks_to_duration(sample.start_time, timescale))
        } else {
            ticks_to_duration(u64::from(sample.duration), timescale)
        };
        chapters.push(Chapter::new(chapter_title(&sample.bytes), length));
    }

    debug!(target: LIBRARY_LOG_TARGET, "{} chapters in {:?}", chapters.len(), path);
    Ok(chapters)
}

fn is_chapter_track(track: &mp4::Mp4Track) -> bool {
    let text_like = matches!(track.media_type(), Ok(mp4::MediaType::TTXT) | Err(_));
    let audio_visual = matches!(
        track.track_type(),
        Ok(mp4::TrackType::Audio | mp4::TrackType::Video)
    );
    text_like && !audio_visual
}

/// Track-timescale ticks to a `Duration`, without going through floats.
pub(super) fn ticks_to_duration(ticks: u64, timescale: u64) -> Duration {
    let timescale = timescale.max(1);
    Duration::from_secs(ticks / timescale)
        + Duration::from_nanos((ticks % timescale) * 1_000_000_000 / timescale)
}

/// Text samples are a big-endian `u16` length followed by UTF-8.
pub(super) fn chapter_title(sample: &[u8]) -> Option<String> {
    let (len, rest) = sample.split_first_chunk::<2>()?;
    let text = rest.get(..usize::from(u16::from_be_bytes(*len)))?;
    let title = String::from_utf8_lossy(text).trim().to_string();
    (!title.is_empty()).then_some(title)
}

/// Load the audio files directly inside `dir` as one book, ordered by file
/// name (case-insensitive).
pub fn load_book(dir: &Path, settings: &LibrarySettings) -> Result<Book, LibraryError> {
    if !dir.is_dir() {
        return Err(LibraryError::NotADirectory(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| LibraryError::Walk {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            files.push(path.to_path_buf());
        }
    }

    if files.is_empty() {
        return Err(LibraryError::NoAudioFiles(dir.to_path_buf()));
    }

    files.sort_by_key(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });

    let title = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    let segments: Vec<Segment> = files.iter().map(|p| read_segment(p)).collect();
    debug!(target: LIBRARY_LOG_TARGET, "{} segments in {:?}", segments.len(), dir);

    Ok(Book {
        work_id: work_id_for(&title),
        title,
        segments,
    })
}
