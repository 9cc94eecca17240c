//! `PlayerModel`: timeline plus volume/flags, with explicit queries.

use crate::events::{PlayerStatus, WorkTime};
use crate::timeline::{Segment, Timeline, format_seconds};

/// UI-facing player state.
///
/// Queries never recompute anything implicitly; mutations go through the
/// setters so the controller can forward the change to the engine.
#[derive(Debug, Clone)]
pub struct PlayerModel {
    pub timeline: Timeline,
    pub work_id: Option<String>,
    /// A book is loaded and the engine was told about it.
    pub ready: bool,
    pub playing: bool,

    volume: f64,
    volume_max: f64,
    muted: bool,
}

impl PlayerModel {
    /// Create an empty model. `volume` is clamped into `[0, volume_max]`.
    pub fn new(volume_max: f64, volume: f64) -> Self {
        let volume_max = if volume_max.is_finite() && volume_max > 0.0 {
            volume_max
        } else {
            0.0
        };
        let mut model = Self {
            timeline: Timeline::default(),
            work_id: None,
            ready: false,
            playing: false,
            volume: 0.0,
            volume_max,
            muted: false,
        };
        model.set_volume(volume);
        model
    }

    /// Replace the timeline wholesale; position resets to the start.
    pub fn load(&mut self, work_id: Option<String>, segments: Vec<Segment>) {
        self.timeline = Timeline::new(segments);
        self.work_id = work_id;
        self.ready = !self.timeline.is_empty();
        self.playing = false;
    }

    /// Drop the current book. Volume settings survive.
    pub fn unload(&mut self) {
        self.timeline = Timeline::default();
        self.work_id = None;
        self.ready = false;
        self.playing = false;
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn volume_max(&self) -> f64 {
        self.volume_max
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    /// Store a new volume, clamped into `[0, volume_max]`, and return it.
    pub fn set_volume(&mut self, value: f64) -> f64 {
        self.volume = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, self.volume_max)
        };
        self.volume
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// The volume the engine should actually use.
    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Volume as a 0-100 share of `volume_max`; 0 when the max is 0.
    pub fn volume_as_percentage(&self) -> f64 {
        if self.volume_max <= 0.0 {
            return 0.0;
        }
        self.volume / self.volume_max * 100.0
    }

    pub fn position_formatted(&self) -> String {
        format_seconds(self.timeline.global_position().as_secs_f64())
    }

    pub fn duration_formatted(&self) -> String {
        format_seconds(self.timeline.duration().as_secs_f64())
    }

    /// Whether the host's checkpoint timer should record progress now.
    pub fn should_checkpoint(&self) -> bool {
        self.ready && self.playing
    }

    /// Progress checkpoint for the current book, if one is due.
    pub fn checkpoint_payload(&self) -> Option<WorkTime> {
        if !self.should_checkpoint() {
            return None;
        }
        Some(WorkTime {
            work_id: self.work_id.clone().unwrap_or_default(),
            position: self.timeline.global_position().as_secs_f64(),
        })
    }

    pub fn status(&self) -> PlayerStatus {
        PlayerStatus {
            ready: self.ready,
            playing: self.playing,
            segment_index: self.timeline.segment_index(),
            position: self.timeline.global_position().as_secs_f64(),
            duration: self.timeline.duration().as_secs_f64(),
            position_percentage: self.timeline.position_as_percentage(),
            volume_percentage: self.volume_as_percentage(),
            muted: self.muted,
            position_formatted: self.position_formatted(),
            duration_formatted: self.duration_formatted(),
            chapters: self.timeline.chapters_as_overlay_segments(),
        }
    }
}

impl Default for PlayerModel {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}
