use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, info, warn};

use super::clock::{PlayClock, TickDeadline};
use super::sink::create_sink_at;
use super::types::{EngineCmd, EngineError, EngineEvent};

pub(super) const ENGINE_LOG_TARGET: &str = "bookline::engine";

/// The source currently held by the engine.
struct Loaded {
    generation: u64,
    index: usize,
    source: PathBuf,
    duration: Option<Duration>,
    sink: Sink,
    finished: bool,
}

struct EngineState {
    loaded: Option<Loaded>,
    clock: PlayClock,
    volume: f32,
}

impl EngineState {
    fn new() -> Self {
        Self {
            loaded: None,
            clock: PlayClock::default(),
            volume: 1.0,
        }
    }

    fn stop(&mut self) {
        if let Some(l) = self.loaded.take() {
            l.sink.stop();
        }
        self.clock.reset(Duration::ZERO, false);
    }

    fn load(
        &mut self,
        stream: &OutputStream,
        generation: u64,
        index: usize,
        source: PathBuf,
        position: Duration,
        autoplay: bool,
    ) {
        self.stop();

        let (sink, duration) = match create_sink_at(stream, &source, position) {
            Ok(v) => v,
            Err(e) => {
                // Load failures stay inside the engine; the controller never hears about them.
                warn!(target: ENGINE_LOG_TARGET, "load of segment {index} failed: {e}");
                return;
            }
        };
        sink.set_volume(self.volume);
        if autoplay {
            sink.play();
        }

        debug!(target: ENGINE_LOG_TARGET, generation, index, ?position, autoplay, "segment loaded");
        self.clock.reset(position, autoplay);
        self.loaded = Some(Loaded {
            generation,
            index,
            source,
            duration,
            sink,
            finished: false,
        });
    }

    /// Rebuild the sink at `position`, keeping the play/pause state.
    fn seek(&mut self, stream: &OutputStream, position: Duration) {
        let Some(l) = self.loaded.as_mut() else {
            return;
        };

        let running = self.clock.is_running();
        match create_sink_at(stream, &l.source, position) {
            Ok((sink, _)) => {
                l.sink.stop();
                sink.set_volume(self.volume);
                if running {
                    sink.play();
                }
                l.sink = sink;
                l.finished = false;
                self.clock.reset(position, running);
            }
            Err(e) => warn!(target: ENGINE_LOG_TARGET, "seek failed: {e}"),
        }
    }

    /// Resume the current source. A drained source stays stopped until it is
    /// loaded or seeked again.
    fn play(&mut self) {
        let Some(l) = self.loaded.as_ref() else {
            return;
        };
        if l.finished {
            debug!(target: ENGINE_LOG_TARGET, "play ignored: segment {} already finished", l.index);
            return;
        }
        l.sink.play();
        self.clock.resume();
    }

    fn pause(&mut self) {
        if let Some(l) = self.loaded.as_ref() {
            l.sink.pause();
            self.clock.pause();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.max(0.0);
        if let Some(l) = self.loaded.as_ref() {
            l.sink.set_volume(self.volume);
        }
    }

    /// Periodic report: a tick while playing, or a single `Finished` once the
    /// sink runs dry.
    fn poll(&mut self) -> Option<EngineEvent> {
        let l = self.loaded.as_mut()?;
        if l.finished || !self.clock.is_running() {
            return None;
        }

        if l.sink.empty() {
            l.finished = true;
            self.clock.pause();
            return Some(EngineEvent::Finished {
                generation: l.generation,
                index: l.index,
            });
        }

        Some(EngineEvent::PositionTick {
            generation: l.generation,
            index: l.index,
            position: self.clock.position(),
            duration: l.duration,
        })
    }
}

pub(super) fn spawn_engine_thread<T>(
    rx: Receiver<EngineCmd>,
    events: Sender<T>,
    tick_interval: Duration,
) -> JoinHandle<()>
where
    T: From<EngineEvent> + Send + 'static,
{
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                error!(target: ENGINE_LOG_TARGET, "{}", EngineError::NoOutputDevice(e.to_string()));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped; stderr is our log stream.
        stream.log_on_drop(false);

        let mut state = EngineState::new();
        let mut deadline = TickDeadline::new(tick_interval, Instant::now());
        info!(target: ENGINE_LOG_TARGET, "engine started");

        loop {
            match rx.recv_timeout(deadline.wait(Instant::now())) {
                Ok(cmd) => match cmd {
                    EngineCmd::Load {
                        generation,
                        index,
                        source,
                        position,
                        autoplay,
                    } => state.load(&stream, generation, index, source, position, autoplay),
                    EngineCmd::Play => state.play(),
                    EngineCmd::Pause => state.pause(),
                    EngineCmd::Seek { position } => state.seek(&stream, position),
                    EngineCmd::SetVolume(v) => state.set_volume(v),
                    EngineCmd::Unload => state.stop(),
                    EngineCmd::Quit => {
                        state.stop();
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if !deadline.due(Instant::now()) {
                continue;
            }
            if let Some(ev) = state.poll() {
                if events.send(T::from(ev)).is_err() {
                    // Nobody is listening any more.
                    state.stop();
                    break;
                }
            }
        }

        info!(target: ENGINE_LOG_TARGET, "engine stopped");
    })
}
