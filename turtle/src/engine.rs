// pathfinder/turtle/src/engine.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The turtle: pen state, a canvas, and a paced command queue.

use crate::canvas::{Canvas, Scene};
use crate::clock::Clock;
use crate::config::TurtleConfig;
use crate::error::{CommandError, TurtleError};
use crate::state::{advance, finite, normalize_degrees, Cursor, Stroke, TurtleState};
use crate::DrawFlags;
use kurbo::{Line, Point, Vec2};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};
use uturtle::{Color, Command};

const HAIRLINE_STROKE_WIDTH: f64 = 0.0333;
const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);
const MAX_CIRCLE_STEPS: f64 = 6000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing scheduled and nothing queued.
    Idle,
    /// A tick is pending and will run the next queued command.
    Playing,
    /// Halted by `stop()` or by a failing command. Queued commands are kept
    /// until the next `execute_commands` or `reset`.
    Stopped,
}

/// One turtle bound to one canvas.
///
/// All operations take `&mut self` and run on the caller's thread. Playback
/// is cooperative: `execute_commands` only enqueues, and the owner drives
/// the queue by calling `poll` (or `run_until_idle`) from its event loop.
#[derive(Debug)]
pub struct Turtle<C: Canvas> {
    state: TurtleState,
    canvas: C,
    config: TurtleConfig,
    queue: VecDeque<Command>,
    playback: PlaybackState,
    next_tick: Option<Instant>,
    speed: f64,
    flags: DrawFlags,
}

impl Turtle<Scene> {
    /// A turtle recording into a fresh scene sized from `config`.
    pub fn recording(config: TurtleConfig) -> Turtle<Scene> {
        let scene = Scene::new(config.size());
        Turtle::new(scene, config)
    }
}

impl<C: Canvas> Turtle<C> {
    pub fn new(canvas: C, config: TurtleConfig) -> Turtle<C> {
        let state = initial_state(&canvas, &config);
        let speed = config.speed;
        Turtle {
            state,
            canvas,
            config,
            queue: VecDeque::new(),
            playback: PlaybackState::Idle,
            next_tick: None,
            speed,
            flags: DrawFlags::empty(),
        }
    }

    #[inline]
    pub fn state(&self) -> &TurtleState {
        &self.state
    }

    #[inline]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    #[inline]
    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    #[inline]
    pub fn config(&self) -> &TurtleConfig {
        &self.config
    }

    #[inline]
    pub fn flags(&self) -> DrawFlags {
        self.flags
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The cursor to draw, or `None` while the turtle is hidden.
    pub fn cursor(&self) -> Option<Cursor> {
        if self.state.visible {
            Some(self.state.cursor())
        } else {
            None
        }
    }

    fn center(&self) -> Point {
        let size = self.canvas.size();
        Point::new(size.width / 2.0, size.height / 2.0)
    }

    // Immediate operations.

    pub fn forward(&mut self, distance: f64) -> Result<(), TurtleError> {
        let to = self.state.ahead(distance)?;
        self.move_to(to)
    }

    #[inline]
    pub fn backward(&mut self, distance: f64) -> Result<(), TurtleError> {
        self.forward(-distance)
    }

    #[inline]
    pub fn right(&mut self, degrees: f64) -> Result<(), TurtleError> {
        self.state.turn(degrees)
    }

    #[inline]
    pub fn left(&mut self, degrees: f64) -> Result<(), TurtleError> {
        self.state.turn(-degrees)
    }

    #[inline]
    pub fn pen_up(&mut self) {
        self.state.pen_down = false;
    }

    #[inline]
    pub fn pen_down(&mut self) {
        self.state.pen_down = true;
    }

    #[inline]
    pub fn set_color(&mut self, color: Color) {
        self.state.stroke.color = color;
    }

    #[inline]
    pub fn set_width(&mut self, width: f64) -> Result<(), TurtleError> {
        self.state.set_width(width)
    }

    #[inline]
    pub fn set_heading(&mut self, degrees: f64) -> Result<(), TurtleError> {
        self.state.set_heading(degrees)
    }

    /// Moves to `(x, y)` measured from the canvas centre with y pointing up,
    /// drawing if the pen is down.
    pub fn go_to(&mut self, x: f64, y: f64) -> Result<(), TurtleError> {
        let to = self.center() + Vec2::new(finite(x, "x")?, -finite(y, "y")?);
        self.move_to(to)
    }

    pub fn go_x(&mut self, x: f64) -> Result<(), TurtleError> {
        let to = Point::new(self.center().x + finite(x, "x")?, self.state.position.y);
        self.move_to(to)
    }

    pub fn go_y(&mut self, y: f64) -> Result<(), TurtleError> {
        let to = Point::new(self.state.position.x, self.center().y - finite(y, "y")?);
        self.move_to(to)
    }

    pub fn home(&mut self) -> Result<(), TurtleError> {
        self.move_to(self.center())?;
        self.state.heading = 0.0;
        Ok(())
    }

    /// Approximates an arc with a regular polygon. A positive radius curves
    /// to the left; `extent` is the swept angle in degrees.
    ///
    /// Every vertex is computed before anything moves. If the canvas fails
    /// part way, the turtle goes back to where it started.
    pub fn circle(&mut self, radius: f64, extent: f64) -> Result<(), TurtleError> {
        let radius = finite(radius, "circle radius")?;
        let extent = finite(extent, "circle extent")?;
        let fraction = extent.abs() / 360.0;
        let steps = 1 + ((11.0 + radius.abs() / 6.0).min(59.0) * fraction).min(MAX_CIRCLE_STEPS)
            as usize;
        let mut turn = extent / steps as f64;
        let mut half_turn = 0.5 * turn;
        let mut chord = finite(2.0 * radius * half_turn.to_radians().sin(), "circle chord")?;
        if radius < 0.0 {
            chord = -chord;
            turn = -turn;
            half_turn = -half_turn;
        }

        let mut heading = normalize_degrees(self.state.heading - half_turn);
        let mut position = self.state.position;
        let mut vertices = Vec::with_capacity(steps);
        for _ in 0..steps {
            position = advance(position, heading, chord)?;
            vertices.push(position);
            heading = normalize_degrees(heading - turn);
        }

        let start = self.state.position;
        for vertex in vertices {
            if let Err(err) = self.move_to(vertex) {
                self.state.position = start;
                return Err(err);
            }
        }
        self.state.heading = normalize_degrees(heading + half_turn);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), TurtleError> {
        self.canvas.clear()?;
        Ok(())
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    #[inline]
    pub fn show(&mut self) {
        self.state.visible = true;
    }

    #[inline]
    pub fn hide(&mut self) {
        self.state.visible = false;
    }

    #[inline]
    pub fn push_location(&mut self) {
        self.state.push_location();
    }

    #[inline]
    pub fn pop_location(&mut self) -> Result<(), TurtleError> {
        self.state.pop_location()
    }

    #[inline]
    pub fn push_rotation(&mut self) {
        self.state.push_rotation();
    }

    #[inline]
    pub fn pop_rotation(&mut self) -> Result<(), TurtleError> {
        self.state.pop_rotation()
    }

    /// Empties the queue, stops playback, clears the canvas and restores the
    /// initial pen state. Playback is stopped even when the canvas fails to
    /// clear; the pen state is then left as it was.
    pub fn reset(&mut self) -> Result<(), TurtleError> {
        self.queue.clear();
        self.playback = PlaybackState::Idle;
        self.next_tick = None;
        self.reset_drawing()?;
        debug!("turtle reset");
        Ok(())
    }

    // Queued `Reset` commands use this: the rest of their batch still runs.
    fn reset_drawing(&mut self) -> Result<(), TurtleError> {
        self.canvas.clear()?;
        self.state = initial_state(&self.canvas, &self.config);
        self.speed = self.config.speed;
        self.flags = DrawFlags::empty();
        Ok(())
    }

    fn move_to(&mut self, to: Point) -> Result<(), TurtleError> {
        if self.state.pen_down {
            self.line_to(to)?;
        }
        self.state.position = to;
        Ok(())
    }

    fn line_to(&mut self, to: Point) -> Result<(), TurtleError> {
        let from = self.state.position;
        let mut stroke = self.state.stroke;
        if stroke.width < HAIRLINE_STROKE_WIDTH {
            stroke.width = HAIRLINE_STROKE_WIDTH;
            self.flags |= DrawFlags::HAIRLINE_CLAMPED;
        }

        let size = self.canvas.size();
        let inside = |p: Point| p.x >= 0.0 && p.x <= size.width && p.y >= 0.0 && p.y <= size.height;
        if !inside(from) || !inside(to) {
            self.flags |= DrawFlags::OFF_CANVAS;
        }

        self.canvas.draw_line(Line::new(from, to), &stroke)?;
        Ok(())
    }

    /// Runs a single command right away, ignoring playback pacing.
    pub fn apply(&mut self, command: &Command) -> Result<(), TurtleError> {
        match *command {
            Command::Reset => self.reset_drawing()?,
            Command::Clear => self.clear()?,
            Command::Forward(distance) => self.forward(distance)?,
            Command::Turn(degrees) => self.right(degrees)?,
            Command::Direction(degrees) => self.set_heading(degrees)?,
            Command::PenState(true) => self.pen_down(),
            Command::PenState(false) => self.pen_up(),
            Command::SetColor(color) => self.set_color(color),
            Command::SetWidth(width) => self.set_width(width)?,
            Command::Go(x, y) => self.go_to(x, y)?,
            Command::GoX(x) => self.go_x(x)?,
            Command::GoY(y) => self.go_y(y)?,
            Command::Home => self.home()?,
            Command::Circle { radius, extent } => self.circle(radius, extent)?,
            Command::PushLoc => self.push_location(),
            Command::PopLoc => self.pop_location()?,
            Command::PushRot => self.push_rotation(),
            Command::PopRot => self.pop_rotation()?,
            Command::Speed(speed) => self.set_speed(speed),
            Command::Visible(true) => self.show(),
            Command::Visible(false) => self.hide(),
        }
        Ok(())
    }

    /// Runs a whole script immediately, stopping at the first failure.
    pub fn apply_all(&mut self, commands: &[Command]) -> Result<(), CommandError> {
        for command in commands {
            self.apply(command).map_err(|source| CommandError {
                command: command.clone(),
                source,
            })?;
        }
        Ok(())
    }

    // Playback.

    #[inline]
    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.playback == PlaybackState::Playing
    }

    /// Commands waiting to be played, front first.
    pub fn pending(&self) -> impl Iterator<Item = &Command> + '_ {
        self.queue.iter()
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// When the pending tick is due, if any.
    #[inline]
    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    /// `base_delay / speed`, or zero when the speed is not a positive number.
    /// Capped at one day.
    pub fn delay(&self) -> Duration {
        if self.speed > 0.0 && self.speed.is_finite() {
            let seconds = self.config.base_delay().as_secs_f64() / self.speed;
            Duration::try_from_secs_f64(seconds)
                .unwrap_or(MAX_DELAY)
                .min(MAX_DELAY)
        } else {
            Duration::ZERO
        }
    }

    /// Appends to the queue and starts playback if it is not already running.
    /// The first command is due at `now`.
    pub fn execute_commands<I>(&mut self, commands: I, now: Instant)
    where
        I: IntoIterator<Item = Command>,
    {
        let before = self.queue.len();
        self.queue.extend(commands);
        debug!(
            added = self.queue.len() - before,
            pending = self.queue.len(),
            "commands queued"
        );

        if self.playback != PlaybackState::Playing && !self.queue.is_empty() {
            self.playback = PlaybackState::Playing;
            self.next_tick = Some(now);
            debug!("playback started");
        }
    }

    /// Halts playback. A pending tick still fires but does nothing.
    pub fn stop(&mut self) {
        if self.playback == PlaybackState::Playing {
            self.playback = PlaybackState::Stopped;
            debug!(pending = self.queue.len(), "playback stopped");
        }
    }

    /// Fires the pending tick if it is due: runs one queued command and
    /// schedules the next.
    pub fn poll(&mut self, now: Instant) -> Result<(), CommandError> {
        match self.next_tick {
            Some(due) if due <= now => self.next_tick = None,
            _ => return Ok(()),
        }
        if self.playback != PlaybackState::Playing {
            trace!("tick dropped; playback is {:?}", self.playback);
            return Ok(());
        }

        let command = match self.queue.pop_front() {
            Some(command) => command,
            None => {
                self.playback = PlaybackState::Idle;
                return Ok(());
            }
        };

        debug!(?command, remaining = self.queue.len(), "executing");
        if let Err(source) = self.apply(&command) {
            self.playback = PlaybackState::Stopped;
            warn!(
                ?command,
                error = %source,
                remaining = self.queue.len(),
                "command failed; playback halted"
            );
            return Err(CommandError { command, source });
        }

        if self.queue.is_empty() {
            self.playback = PlaybackState::Idle;
            debug!("playback finished");
        } else {
            self.next_tick = Some(now + self.delay());
        }
        Ok(())
    }

    /// Drives `poll` with `clock` until nothing is scheduled.
    pub fn run_until_idle<K: Clock>(&mut self, clock: &mut K) -> Result<(), CommandError> {
        while let Some(due) = self.next_tick {
            clock.sleep_until(due);
            self.poll(clock.now())?;
        }
        Ok(())
    }
}

fn initial_state<C: Canvas>(canvas: &C, config: &TurtleConfig) -> TurtleState {
    let size = canvas.size();
    TurtleState::new(
        Point::new(size.width / 2.0, size.height / 2.0),
        Stroke {
            color: config.pen_color,
            width: config.pen_width,
        },
    )
}
