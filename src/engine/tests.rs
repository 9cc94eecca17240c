use super::clock::{PlayClock, TickDeadline};
use super::*;
use std::time::{Duration, Instant};

#[test]
fn paused_clock_reports_start_position() {
    let mut c = PlayClock::default();
    c.reset(Duration::from_millis(42_500), false);
    assert!(!c.is_running());
    assert_eq!(c.position(), Duration::from_millis(42_500));
}

#[test]
fn running_clock_advances_and_pause_freezes_it() {
    let mut c = PlayClock::default();
    c.reset(Duration::from_secs(10), true);
    std::thread::sleep(Duration::from_millis(20));
    c.pause();
    let frozen = c.position();
    assert!(frozen >= Duration::from_millis(10_020));

    std::thread::sleep(Duration::from_millis(10));
    assert_eq!(c.position(), frozen);

    c.resume();
    assert!(c.is_running());
    assert!(c.position() >= frozen);
}

#[test]
fn resume_twice_does_not_restart_the_clock() {
    let mut c = PlayClock::default();
    c.reset(Duration::ZERO, true);
    std::thread::sleep(Duration::from_millis(15));
    c.resume();
    assert!(c.position() >= Duration::from_millis(15));
}

#[test]
fn tick_deadline_fires_under_constant_command_traffic() {
    let interval = Duration::from_millis(250);
    let start = Instant::now();
    let mut deadline = TickDeadline::new(interval, start);

    // Commands every 50ms never let a receive time out, yet reports keep coming.
    let fired = (1..=20)
        .map(|i| start + Duration::from_millis(50 * i))
        .filter(|&now| deadline.due(now))
        .count();
    assert_eq!(fired, 4);
}

#[test]
fn tick_deadline_wait_shrinks_towards_zero() {
    let interval = Duration::from_millis(250);
    let start = Instant::now();
    let mut deadline = TickDeadline::new(interval, start);

    assert_eq!(deadline.wait(start), interval);
    assert_eq!(
        deadline.wait(start + Duration::from_millis(100)),
        Duration::from_millis(150)
    );
    assert_eq!(deadline.wait(start + Duration::from_secs(1)), Duration::ZERO);

    assert!(!deadline.due(start + Duration::from_millis(249)));
    assert!(deadline.due(start + Duration::from_millis(250)));
    assert_eq!(deadline.wait(start + Duration::from_millis(250)), interval);
}

#[test]
fn events_expose_generation_and_index() {
    let tick = EngineEvent::PositionTick {
        generation: 3,
        index: 1,
        position: Duration::from_secs(2),
        duration: None,
    };
    let done = EngineEvent::Finished {
        generation: 4,
        index: 2,
    };
    assert_eq!((tick.generation(), tick.index()), (3, 1));
    assert_eq!((done.generation(), done.index()), (4, 2));
}
