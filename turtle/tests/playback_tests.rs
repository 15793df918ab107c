//! Timed playback of queued commands, driven by a virtual clock.

use kurbo::{Point, Size};
use std::io::{self, Write};
use std::time::Duration;
use turtle_engine::{
    CanvasError, Clock, Command, JsonLines, ManualClock, PlaybackState, Scene, Turtle,
    TurtleConfig, TurtleError,
};

/// Accepts `budget` writes, then fails every one after.
struct FlakyWriter {
    budget: usize,
}

impl Write for FlakyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        self.budget -= 1;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn turtle(speed: f64, base_delay_ms: u64) -> Turtle<Scene> {
    Turtle::recording(TurtleConfig {
        width: 400.0,
        height: 400.0,
        speed,
        base_delay_ms,
        ..TurtleConfig::default()
    })
}

#[test]
fn execute_commands_only_enqueues() {
    let mut turtle = turtle(1.0, 100);
    let clock = ManualClock::new();
    turtle.execute_commands(vec![Command::Forward(10.0), Command::Forward(10.0)], clock.now());

    assert!(turtle.is_animating());
    assert_eq!(turtle.pending_len(), 2);
    assert!(turtle.canvas().segments.is_empty());
    assert_eq!(turtle.next_tick(), Some(clock.now()));
}

#[test]
fn commands_run_one_per_tick_with_paced_delays() {
    let mut turtle = turtle(4.0, 100);
    let mut clock = ManualClock::new();
    turtle.execute_commands(
        vec![
            Command::Forward(10.0),
            Command::Turn(90.0),
            Command::Forward(10.0),
        ],
        clock.now(),
    );

    turtle.poll(clock.now()).unwrap();
    assert_eq!(turtle.canvas().segments.len(), 1);
    assert_eq!(turtle.pending_len(), 2);

    // Not due yet.
    clock.advance(Duration::from_millis(10));
    turtle.poll(clock.now()).unwrap();
    assert_eq!(turtle.pending_len(), 2);

    turtle.run_until_idle(&mut clock).unwrap();
    assert_eq!(turtle.canvas().segments.len(), 2);
    assert_eq!(turtle.playback(), PlaybackState::Idle);
    assert!(!turtle.is_animating());
    // Two gaps of 100ms / 4 after the first command.
    assert_eq!(clock.elapsed(), Duration::from_millis(50));
}

#[test]
fn speed_commands_change_pacing_mid_playback() {
    let mut turtle = turtle(1.0, 100);
    let mut clock = ManualClock::new();
    turtle.execute_commands(
        vec![
            Command::Speed(0.0),
            Command::Forward(1.0),
            Command::Forward(1.0),
            Command::Speed(2.0),
            Command::Forward(1.0),
        ],
        clock.now(),
    );
    turtle.run_until_idle(&mut clock).unwrap();
    assert_eq!(turtle.canvas().segments.len(), 3);
    assert_eq!(clock.elapsed(), Duration::from_millis(50));
}

#[test]
fn non_positive_speed_means_no_delay() {
    let mut turtle = turtle(0.0, 100);
    assert_eq!(turtle.delay(), Duration::ZERO);
    turtle.set_speed(-3.0);
    assert_eq!(turtle.delay(), Duration::ZERO);
    turtle.set_speed(f64::INFINITY);
    assert_eq!(turtle.delay(), Duration::ZERO);
    turtle.set_speed(1e-300);
    assert_eq!(turtle.delay(), Duration::from_secs(24 * 60 * 60));
}

#[test]
fn batches_submitted_while_playing_append_in_order() {
    let mut turtle = turtle(1.0, 10);
    let mut clock = ManualClock::new();
    turtle.execute_commands(vec![Command::Forward(10.0)], clock.now());
    turtle.execute_commands(vec![Command::Turn(90.0), Command::Forward(20.0)], clock.now());
    assert_eq!(turtle.pending_len(), 3);

    turtle.run_until_idle(&mut clock).unwrap();
    let segments = &turtle.canvas().segments;
    assert_eq!(segments.len(), 2);
    assert!((segments[0].length() - 10.0).abs() < 1e-9);
    assert!((segments[1].length() - 20.0).abs() < 1e-9);
    assert!(segments[1].line.p1.y > segments[1].line.p0.y);
}

#[test]
fn stop_halts_and_keeps_the_queue() {
    let mut turtle = turtle(1.0, 100);
    let mut clock = ManualClock::new();
    turtle.execute_commands(vec![Command::Forward(10.0); 4], clock.now());
    turtle.poll(clock.now()).unwrap();
    assert_eq!(turtle.canvas().segments.len(), 1);

    turtle.stop();
    assert!(!turtle.is_animating());
    assert_eq!(turtle.playback(), PlaybackState::Stopped);

    // The pending tick still fires, but runs nothing.
    turtle.run_until_idle(&mut clock).unwrap();
    assert_eq!(turtle.canvas().segments.len(), 1);
    assert_eq!(turtle.pending_len(), 3);
    assert_eq!(turtle.next_tick(), None);

    // Resuming requires a fresh submission.
    turtle.execute_commands(Vec::new(), clock.now());
    assert!(turtle.is_animating());
    turtle.run_until_idle(&mut clock).unwrap();
    assert_eq!(turtle.canvas().segments.len(), 4);
    assert_eq!(turtle.playback(), PlaybackState::Idle);
}

#[test]
fn reset_after_stop_discards_the_queue() {
    let mut turtle = turtle(1.0, 100);
    let mut clock = ManualClock::new();
    turtle.execute_commands(vec![Command::Forward(10.0); 3], clock.now());
    turtle.poll(clock.now()).unwrap();
    turtle.stop();
    turtle.reset().unwrap();

    assert_eq!(turtle.pending_len(), 0);
    assert_eq!(turtle.next_tick(), None);
    turtle.run_until_idle(&mut clock).unwrap();
    assert!(turtle.canvas().segments.is_empty());
    assert_eq!(turtle.playback(), PlaybackState::Idle);
}

#[test]
fn failing_command_aborts_the_rest() {
    let mut turtle = turtle(1.0, 10);
    let mut clock = ManualClock::new();
    turtle.execute_commands(
        vec![
            Command::Forward(10.0),
            Command::PopLoc,
            Command::Forward(10.0),
            Command::Forward(10.0),
        ],
        clock.now(),
    );

    let err = turtle.run_until_idle(&mut clock).unwrap_err();
    assert_eq!(err.command, Command::PopLoc);
    assert!(matches!(err.source, TurtleError::EmptyLocationStack));
    assert_eq!(turtle.playback(), PlaybackState::Stopped);
    assert_eq!(turtle.next_tick(), None);
    assert_eq!(turtle.pending_len(), 2);
    assert_eq!(turtle.canvas().segments.len(), 1);

    // Not retried: polling again does nothing.
    clock.advance(Duration::from_secs(1));
    turtle.poll(clock.now()).unwrap();
    assert_eq!(turtle.pending_len(), 2);
}

#[test]
fn queued_reset_keeps_the_rest_of_its_batch() {
    let mut turtle = turtle(0.0, 10);
    let mut clock = ManualClock::new();
    turtle.execute_commands(
        vec![
            Command::Forward(10.0),
            Command::Reset,
            Command::Turn(90.0),
            Command::Forward(5.0),
        ],
        clock.now(),
    );
    turtle.run_until_idle(&mut clock).unwrap();

    let segments = &turtle.canvas().segments;
    assert_eq!(segments.len(), 1);
    assert!((segments[0].length() - 5.0).abs() < 1e-9);
    assert_eq!(turtle.state().heading, 90.0);
}

#[test]
fn empty_submission_while_idle_does_not_start() {
    let mut turtle = turtle(1.0, 10);
    let clock = ManualClock::new();
    turtle.execute_commands(Vec::new(), clock.now());
    assert_eq!(turtle.playback(), PlaybackState::Idle);
    assert_eq!(turtle.next_tick(), None);
}

#[test]
fn broken_stream_faults_playback_and_keeps_the_rest() {
    let config = TurtleConfig {
        width: 100.0,
        height: 100.0,
        ..TurtleConfig::default()
    };
    let stream = JsonLines::new(FlakyWriter { budget: 1 }, Size::new(100.0, 100.0));
    let mut turtle = Turtle::new(stream, config);
    let mut clock = ManualClock::new();
    turtle.execute_commands(
        vec![
            Command::Forward(10.0),
            Command::Forward(10.0),
            Command::Turn(90.0),
            Command::Forward(10.0),
        ],
        clock.now(),
    );

    let err = turtle.run_until_idle(&mut clock).unwrap_err();
    assert_eq!(err.command, Command::Forward(10.0));
    assert!(matches!(
        err.source,
        TurtleError::Canvas(CanvasError::Io(_))
    ));
    assert_eq!(turtle.playback(), PlaybackState::Stopped);
    assert_eq!(turtle.next_tick(), None);
    assert_eq!(turtle.pending_len(), 2);
    // The failed move did not happen.
    assert_eq!(turtle.state().position, Point::new(60.0, 50.0));
}

#[test]
fn broken_stream_fails_a_queued_clear() {
    let stream = JsonLines::new(FlakyWriter { budget: 0 }, Size::new(100.0, 100.0));
    let mut turtle = Turtle::new(stream, TurtleConfig::default());
    let mut clock = ManualClock::new();
    turtle.execute_commands(vec![Command::Clear, Command::Forward(1.0)], clock.now());

    let err = turtle.run_until_idle(&mut clock).unwrap_err();
    assert_eq!(err.command, Command::Clear);
    assert!(matches!(err.source, TurtleError::Canvas(_)));
    assert_eq!(turtle.pending_len(), 1);
    assert!(turtle.reset().is_err());
    assert_eq!(turtle.pending_len(), 0);
    assert_eq!(turtle.playback(), PlaybackState::Idle);
}
