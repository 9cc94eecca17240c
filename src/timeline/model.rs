//! The `Timeline` type: ordered segments plus the current playback position.
//!
//! Positions and durations are `Duration`s, so global/local conversions are
//! exact integer arithmetic.

use std::time::Duration;

use super::segment::{Chapter, OverlaySegment, Segment};

/// A resolved location on the timeline in segment-local coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Position {
    pub segment_index: usize,
    pub local_offset: Duration,
}

/// Ordered segments of one book and the position inside them.
///
/// Empty means "nothing loaded"; every query degrades to zero/empty instead of
/// failing.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    segments: Vec<Segment>,
    position: Position,
}

impl Timeline {
    /// Create a timeline positioned at the start of the first segment.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            position: Position::default(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn segment_index(&self) -> usize {
        self.position.segment_index
    }

    pub fn local_offset(&self) -> Duration {
        self.position.local_offset
    }

    /// Sum of all segment durations.
    pub fn duration(&self) -> Duration {
        self.segments.iter().map(|s| s.duration).sum()
    }

    /// All chapters, segment by segment, keeping intra-segment order.
    pub fn chapters(&self) -> Vec<&Chapter> {
        self.segments.iter().flat_map(|s| s.chapters.iter()).collect()
    }

    /// Global position for the current `(segment_index, local_offset)`.
    pub fn global_position(&self) -> Duration {
        if self.segments.is_empty() {
            return Duration::ZERO;
        }

        let before: Duration = self
            .segments
            .iter()
            .take(self.position.segment_index)
            .map(|s| s.duration)
            .sum();
        before + self.position.local_offset
    }

    /// Resolve a global position into a segment and local offset without moving.
    ///
    /// `value` is clamped to `duration()`. Exactly `duration()` maps to the end
    /// of the last segment. Returns `None` when the timeline has no length to
    /// resolve against.
    pub fn resolve(&self, value: Duration) -> Option<Position> {
        let total = self.duration();
        if total.is_zero() {
            return None;
        }

        let value = value.min(total);
        let mut sum = Duration::ZERO;
        for (i, seg) in self.segments.iter().enumerate() {
            if sum + seg.duration > value {
                return Some(Position {
                    segment_index: i,
                    local_offset: value - sum,
                });
            }
            sum += seg.duration;
        }

        // Only reachable for value == total: land on the end of the last segment.
        let last = self.segments.len() - 1;
        Some(Position {
            segment_index: last,
            local_offset: self.segments[last].duration,
        })
    }

    /// Move to the given global position. A no-op on a zero-length timeline.
    pub fn set_global_position(&mut self, value: Duration) -> Option<Position> {
        let resolved = self.resolve(value)?;
        self.position = resolved;
        Some(resolved)
    }

    /// Jump to a segment-local position; the offset is clamped into the segment.
    /// Returns `None` (and leaves the position alone) for an unknown index.
    pub fn set_local_position(&mut self, segment_index: usize, offset: Duration) -> Option<Position> {
        let seg = self.segments.get(segment_index)?;
        self.position = Position {
            segment_index,
            local_offset: offset.min(seg.duration),
        };
        Some(self.position)
    }

    /// Update the offset within the current segment, as reported by the engine.
    pub fn set_local_offset(&mut self, offset: Duration) {
        if let Some(seg) = self.segments.get(self.position.segment_index) {
            self.position.local_offset = offset.min(seg.duration);
        }
    }

    /// Position as a 0-100 share of the whole book; 0 when there is no duration.
    pub fn position_as_percentage(&self) -> f64 {
        let total = self.duration();
        if total.is_zero() {
            return 0.0;
        }
        self.global_position().as_secs_f64() / total.as_secs_f64() * 100.0
    }

    /// Chapters as percentage spans of the book.
    ///
    /// The running offset advances by chapter length, not by segment duration;
    /// when the two disagree the spans drift from their segments.
    pub fn chapters_as_overlay_segments(&self) -> Vec<OverlaySegment> {
        let total = self.duration();
        if total.is_zero() {
            return Vec::new();
        }

        let total = total.as_secs_f64();
        let mut running = Duration::ZERO;
        self.chapters()
            .into_iter()
            .map(|c| {
                let seg = OverlaySegment {
                    start: running.as_secs_f64() / total * 100.0,
                    end: (running + c.length).as_secs_f64() / total * 100.0,
                };
                running += c.length;
                seg
            })
            .collect()
    }
}
