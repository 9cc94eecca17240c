use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config;
use crate::controller::PlaybackController;
use crate::engine::EngineEvent;
use crate::events::{HostEvent, UiCommand};
use crate::library::load_book;

pub(super) const RUNTIME_LOG_TARGET: &str = "bookline::runtime";

/// How long the loop sleeps when no checkpoint timer is armed.
const IDLE_WAIT: Duration = Duration::from_secs(1);

/// Everything the runtime loop reacts to, funnelled through one channel.
#[derive(Debug)]
pub enum RuntimeMsg {
    Engine(EngineEvent),
    Ui(UiCommand),
    InputClosed,
}

impl From<EngineEvent> for RuntimeMsg {
    fn from(ev: EngineEvent) -> Self {
        RuntimeMsg::Engine(ev)
    }
}

/// Fixed-interval timer driving progress checkpoints.
pub(super) struct CheckpointTimer {
    interval: Option<Duration>,
    last: Instant,
}

impl CheckpointTimer {
    pub(super) fn new(settings: &config::CheckpointSettings, now: Instant) -> Self {
        Self {
            interval: settings
                .enabled
                .then(|| Duration::from_millis(settings.interval_ms)),
            last: now,
        }
    }

    /// Time left until the next checkpoint.
    pub(super) fn wait(&self, now: Instant) -> Duration {
        match self.interval {
            Some(interval) => interval.saturating_sub(now.duration_since(self.last)),
            None => IDLE_WAIT,
        }
    }

    /// Returns true and re-arms when a checkpoint is due.
    pub(super) fn fire(&mut self, now: Instant) -> bool {
        match self.interval {
            Some(interval) if now.duration_since(self.last) >= interval => {
                self.last = now;
                true
            }
            _ => false,
        }
    }
}

/// Apply one UI command. Returns `true` when the runtime should shut down.
pub(super) fn handle_ui_command(
    cmd: UiCommand,
    controller: &mut PlaybackController,
    settings: &config::Settings,
) -> bool {
    debug!(target: RUNTIME_LOG_TARGET, "ui -> {:?}", cmd);
    match cmd {
        UiCommand::Load(req) => match load_book(&req.path, &settings.library) {
            Ok(book) => controller.load(book),
            Err(e) => warn!(target: RUNTIME_LOG_TARGET, "load failed: {e}"),
        },
        UiCommand::Play => controller.play(),
        UiCommand::Pause => controller.pause(),
        UiCommand::Unload => controller.unload(),
        UiCommand::Forward => controller.skip_forward(),
        UiCommand::Backward => controller.skip_backward(),
        UiCommand::SetPosition(req) => controller.set_position(req),
        UiCommand::Seek(req) => controller.seek_global(req.position),
        UiCommand::SetVolume(v) => controller.set_volume(v),
        UiCommand::SetMuted(m) => controller.set_muted(m),
        UiCommand::Status => controller.report_status(),
        UiCommand::Quit => return true,
    }
    false
}

/// Drain pending host events onto `out` as JSON lines.
pub(super) fn write_events<W: Write>(host_rx: &Receiver<HostEvent>, out: &mut W) -> io::Result<()> {
    let mut wrote = false;
    while let Ok(event) = host_rx.try_recv() {
        match event.to_json_line() {
            Ok(line) => {
                writeln!(out, "{line}")?;
                wrote = true;
            }
            Err(e) => warn!(target: RUNTIME_LOG_TARGET, "dropping unserialisable event: {e}"),
        }
    }
    if wrote {
        out.flush()?;
    }
    Ok(())
}

/// Main loop: dispatch engine and UI messages, fire checkpoints, and flush
/// host events. Returns when the UI quits or its input closes.
pub fn run<W: Write>(
    controller: &mut PlaybackController,
    inbox: &Receiver<RuntimeMsg>,
    host_rx: &Receiver<HostEvent>,
    settings: &config::Settings,
    out: &mut W,
) -> io::Result<()> {
    let mut timer = CheckpointTimer::new(&settings.checkpoint, Instant::now());

    // Events queued during startup.
    write_events(host_rx, out)?;

    loop {
        let quit = match inbox.recv_timeout(timer.wait(Instant::now())) {
            Ok(RuntimeMsg::Engine(ev)) => {
                controller.handle_engine_event(ev);
                false
            }
            Ok(RuntimeMsg::Ui(cmd)) => handle_ui_command(cmd, controller, settings),
            Ok(RuntimeMsg::InputClosed) => {
                info!(target: RUNTIME_LOG_TARGET, "input closed");
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => true,
        };

        if timer.fire(Instant::now()) {
            controller.checkpoint();
        }
        write_events(host_rx, out)?;

        if quit {
            break;
        }
    }

    info!(target: RUNTIME_LOG_TARGET, "shutting down");
    Ok(())
}
