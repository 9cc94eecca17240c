//! Utilities for creating `rodio` sinks from segment sources.
//!
//! Opening/decoding a file and preparing a paused `Sink` at the requested
//! start position happens here.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::EngineError;

/// Create a paused `Sink` for `source` that starts playback at `start_at`.
///
/// Also returns the decoder's total duration when it knows it.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    source: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), EngineError> {
    let file = File::open(source).map_err(|e| EngineError::Open {
        path: source.to_path_buf(),
        source: e,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
        path: source.to_path_buf(),
        source: e,
    })?;
    let duration = decoder.total_duration();

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let decoded = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(decoded);
    sink.pause();
    Ok((sink, duration))
}
