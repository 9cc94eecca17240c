use std::time::{Duration, Instant};

/// Tracks the playback position of the current source.
///
/// Position is `base` plus wall time since the last resume.
#[derive(Debug, Default)]
pub(crate) struct PlayClock {
    base: Duration,
    started_at: Option<Instant>,
}

impl PlayClock {
    /// Restart counting from `start`.
    pub(crate) fn reset(&mut self, start: Duration, running: bool) {
        self.base = start;
        self.started_at = running.then(Instant::now);
    }

    pub(crate) fn resume(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub(crate) fn pause(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.base += st.elapsed();
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub(crate) fn position(&self) -> Duration {
        let running = self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        self.base + running
    }
}

/// Fixed-rate schedule for position reports, independent of command traffic.
#[derive(Debug)]
pub(crate) struct TickDeadline {
    interval: Duration,
    next: Instant,
}

impl TickDeadline {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    /// How long a receive may block before the next report is due.
    pub(crate) fn wait(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Returns true and schedules the following report once the deadline passed.
    pub(crate) fn due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next = now + self.interval;
        true
    }
}
