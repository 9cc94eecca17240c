use std::sync::mpsc::Sender;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::engine::{EngineCmd, EngineEvent};
use crate::events::{FilePosition, HostEvent, SetFilePosition, WorkLoaded};
use crate::library::Book;
use crate::model::PlayerModel;
use crate::timeline::{SkipMode, duration_from_secs};

use super::state::PlaybackState;

pub const CONTROLLER_LOG_TARGET: &str = "bookline::controller";

/// Owns the player model and translates between global and segment-local
/// coordinates in both directions.
pub struct PlaybackController {
    model: PlayerModel,
    state: PlaybackState,
    skip_mode: SkipMode,
    /// Bumped whenever the engine is told to load or drop a segment.
    generation: u64,
    /// The engine drained the current segment and did not move on.
    segment_ended: bool,
    engine: Sender<EngineCmd>,
    host: Sender<HostEvent>,
}

impl PlaybackController {
    pub fn new(model: PlayerModel, engine: Sender<EngineCmd>, host: Sender<HostEvent>) -> Self {
        Self {
            model,
            state: PlaybackState::Unloaded,
            skip_mode: SkipMode::default(),
            generation: 0,
            segment_ended: false,
            engine,
            host,
        }
    }

    pub fn model(&self) -> &PlayerModel {
        &self.model
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn skip_mode(&self) -> SkipMode {
        self.skip_mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn send_engine(&self, cmd: EngineCmd) {
        trace!(target: CONTROLLER_LOG_TARGET, "engine <- {:?}", cmd);
        if self.engine.send(cmd).is_err() {
            debug!(target: CONTROLLER_LOG_TARGET, "engine channel closed; command dropped");
        }
    }

    fn emit(&self, event: HostEvent) {
        if self.host.send(event).is_err() {
            debug!(target: CONTROLLER_LOG_TARGET, "host channel closed; event dropped");
        }
    }

    /// Point the engine at `index`/`offset` under a fresh generation.
    fn load_segment(&mut self, index: usize, offset: Duration, autoplay: bool) {
        let Some(pos) = self.model.timeline.set_local_position(index, offset) else {
            return;
        };
        let Some(source) = self.model.timeline.segment(index).map(|s| s.source.clone()) else {
            return;
        };

        self.generation += 1;
        self.segment_ended = false;
        self.send_engine(EngineCmd::Load {
            generation: self.generation,
            index,
            source,
            position: pos.local_offset,
            autoplay,
        });

        self.state = if autoplay {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };
        self.model.playing = autoplay;
    }

    /// Replace the current book. The engine gets segment 0 at offset 0 and
    /// stays paused. An empty book unloads.
    pub fn load(&mut self, book: Book) {
        if book.segments.is_empty() {
            warn!(target: CONTROLLER_LOG_TARGET, "book {} has no segments; unloading", book.work_id);
            self.unload();
            return;
        }

        let Book {
            work_id,
            title,
            segments,
        } = book;
        info!(
            target: CONTROLLER_LOG_TARGET,
            "loading {} ({} segments)",
            work_id,
            segments.len()
        );

        let files = segments.iter().map(|s| s.source.clone()).collect();
        self.model.load(Some(work_id.clone()), segments);
        self.skip_mode = SkipMode::for_segment_count(self.model.timeline.len());

        self.emit(HostEvent::WorkLoaded(WorkLoaded {
            work_id,
            title,
            files,
        }));
        self.emit(HostEvent::MetadataLoaded(
            self.model.timeline.segments().to_vec(),
        ));

        self.load_segment(0, Duration::ZERO, false);
    }

    /// Clear the book and stop the engine.
    pub fn unload(&mut self) {
        info!(target: CONTROLLER_LOG_TARGET, "unloading");
        self.model.unload();
        self.skip_mode = SkipMode::default();
        self.generation += 1;
        self.segment_ended = false;
        self.state = PlaybackState::Unloaded;
        self.send_engine(EngineCmd::Unload);
    }

    /// Resume playback. After the engine ran out of a segment without moving
    /// on, the segment is played again from its start.
    pub fn play(&mut self) {
        if !self.state.is_loaded() {
            debug!(target: CONTROLLER_LOG_TARGET, "play ignored: nothing loaded");
            return;
        }
        if self.segment_ended {
            let index = self.model.timeline.segment_index();
            debug!(target: CONTROLLER_LOG_TARGET, "segment {index} ended, restarting it");
            self.load_segment(index, Duration::ZERO, true);
            return;
        }
        self.send_engine(EngineCmd::Play);
        self.state = PlaybackState::Playing;
        self.model.playing = true;
    }

    pub fn pause(&mut self) {
        if !self.state.is_loaded() {
            debug!(target: CONTROLLER_LOG_TARGET, "pause ignored: nothing loaded");
            return;
        }
        self.send_engine(EngineCmd::Pause);
        self.state = PlaybackState::Paused;
        self.model.playing = false;
    }

    /// Whether `index` may advance to the next segment.
    ///
    /// The final index is never entered by skip or auto-advance: the bound is
    /// `index + 1 < count - 1`, not `index + 1 < count`.
    fn can_advance_from(&self, index: usize) -> bool {
        let count = self.model.timeline.len();
        count > 0 && index + 1 < count - 1
    }

    /// Load the next file, paused. Only in per-file skip mode.
    pub fn skip_forward(&mut self) {
        if !self.state.is_loaded() || self.skip_mode != SkipMode::PerFile {
            debug!(target: CONTROLLER_LOG_TARGET, "forward ignored ({:?}, {:?})", self.state, self.skip_mode);
            return;
        }

        let index = self.model.timeline.segment_index();
        if self.can_advance_from(index) {
            self.load_segment(index + 1, Duration::ZERO, false);
        }
    }

    /// Load the previous file, paused. Only in per-file skip mode.
    pub fn skip_backward(&mut self) {
        if !self.state.is_loaded() || self.skip_mode != SkipMode::PerFile {
            debug!(target: CONTROLLER_LOG_TARGET, "backward ignored ({:?}, {:?})", self.state, self.skip_mode);
            return;
        }

        let index = self.model.timeline.segment_index();
        if index > 0 {
            self.load_segment(index - 1, Duration::ZERO, false);
        }
    }

    /// Entry point for everything the engine reports.
    ///
    /// Events stamped with an older generation, or with a segment other than
    /// the current one, are dropped.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        if !self.state.is_loaded()
            || event.generation() != self.generation
            || event.index() != self.model.timeline.segment_index()
        {
            debug!(
                target: CONTROLLER_LOG_TARGET,
                "dropping stale engine event {:?} (generation {})",
                event,
                self.generation
            );
            return;
        }

        match event {
            EngineEvent::PositionTick {
                position, duration, ..
            } => self.on_engine_position_tick(position, duration),
            EngineEvent::Finished { .. } => self.on_engine_finished_segment(),
        }
    }

    /// Apply a local position report to the current segment.
    pub fn on_engine_position_tick(&mut self, local: Duration, duration: Option<Duration>) {
        if !self.state.is_loaded() {
            return;
        }

        self.model.timeline.set_local_offset(local);
        self.emit(HostEvent::UpdateFilePosition(FilePosition {
            position: self.model.timeline.local_offset().as_secs_f64(),
            duration: duration.map(|d| d.as_secs_f64()),
            file_index: self.model.timeline.segment_index(),
        }));
    }

    /// The current segment ran out. Advances and plays when allowed, otherwise
    /// stays stopped at the end of the segment.
    pub fn on_engine_finished_segment(&mut self) {
        if !self.state.is_loaded() {
            return;
        }

        let index = self.model.timeline.segment_index();
        if self.can_advance_from(index) {
            info!(target: CONTROLLER_LOG_TARGET, "segment {index} finished, advancing");
            self.load_segment(index + 1, Duration::ZERO, true);
            return;
        }

        info!(target: CONTROLLER_LOG_TARGET, "segment {index} finished, not advancing");
        if let Some(end) = self.model.timeline.segment(index).map(|s| s.duration) {
            self.model.timeline.set_local_offset(end);
        }
        self.segment_ended = true;
        self.state = PlaybackState::Paused;
        self.model.playing = false;
    }

    /// Seek to global seconds. Crossing into another segment reloads and plays;
    /// staying in the current one seeks in place and keeps play/pause state.
    pub fn seek_global(&mut self, value: f64) {
        if !self.state.is_loaded() {
            return;
        }

        let previous = self.model.timeline.segment_index();
        let target = duration_from_secs(value);
        let Some(pos) = self.model.timeline.set_global_position(target) else {
            return;
        };

        if pos.segment_index != previous {
            self.load_segment(pos.segment_index, pos.local_offset, true);
        } else {
            self.segment_ended = false;
            self.send_engine(EngineCmd::Seek {
                position: pos.local_offset,
            });
        }

        self.emit(HostEvent::SetFilePosition(SetFilePosition {
            position: pos.local_offset.as_secs_f64(),
            index: pos.segment_index,
        }));
    }

    /// Seek in local coordinates, as requested by the UI.
    pub fn set_position(&mut self, request: SetFilePosition) {
        if !self.state.is_loaded() {
            return;
        }
        if request.index >= self.model.timeline.len() {
            warn!(
                target: CONTROLLER_LOG_TARGET,
                "set_position: index {} out of range ({} segments)",
                request.index,
                self.model.timeline.len()
            );
            return;
        }

        let offset = duration_from_secs(request.position);
        if request.index != self.model.timeline.segment_index() {
            self.load_segment(request.index, offset, true);
        } else if let Some(pos) = self.model.timeline.set_local_position(request.index, offset) {
            self.segment_ended = false;
            self.send_engine(EngineCmd::Seek {
                position: pos.local_offset,
            });
        }
    }

    /// Set the volume; works whether or not a book is loaded.
    pub fn set_volume(&mut self, value: f64) {
        self.model.set_volume(value);
        self.push_volume();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.model.set_muted(muted);
        self.push_volume();
    }

    fn push_volume(&self) {
        let effective = self.model.effective_volume();
        self.send_engine(EngineCmd::SetVolume(effective as f32));
        self.emit(HostEvent::SetVolume(effective));
    }

    /// Emit a progress checkpoint if one is due. Called by the host's timer.
    pub fn checkpoint(&self) -> bool {
        match self.model.checkpoint_payload() {
            Some(payload) => {
                self.emit(HostEvent::UpdateWorkTime(payload));
                true
            }
            None => false,
        }
    }

    /// Publish a full status snapshot for the UI.
    pub fn report_status(&self) {
        self.emit(HostEvent::Status(self.model.status()));
    }
}
