// pathfinder/turtle/src/state.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pen state of a single turtle.

use crate::error::TurtleError;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uturtle::Color;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// Where the turtle is and which way it faces, for drawing the cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub position: Point,
    pub heading: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TurtleState {
    pub position: Point,
    /// Degrees in `[0, 360)`. Zero points along +x, 90 along +y.
    pub heading: f64,
    pub pen_down: bool,
    pub stroke: Stroke,
    pub visible: bool,
    pub(crate) locations: Vec<Point>,
    pub(crate) rotations: Vec<f64>,
}

impl TurtleState {
    pub fn new(center: Point, stroke: Stroke) -> TurtleState {
        TurtleState {
            position: center,
            heading: 0.0,
            pen_down: true,
            stroke,
            visible: true,
            locations: Vec::new(),
            rotations: Vec::new(),
        }
    }

    /// The point `distance` units ahead along the current heading.
    pub fn ahead(&self, distance: f64) -> Result<Point, TurtleError> {
        advance(self.position, self.heading, distance)
    }

    pub fn turn(&mut self, degrees: f64) -> Result<(), TurtleError> {
        self.heading = normalize_degrees(finite(self.heading + degrees, "heading")?);
        Ok(())
    }

    pub fn set_heading(&mut self, degrees: f64) -> Result<(), TurtleError> {
        self.heading = normalize_degrees(finite(degrees, "heading")?);
        Ok(())
    }

    pub fn set_width(&mut self, width: f64) -> Result<(), TurtleError> {
        self.stroke.width = finite(width, "pen width")?;
        Ok(())
    }

    pub fn push_location(&mut self) {
        self.locations.push(self.position);
    }

    pub fn pop_location(&mut self) -> Result<(), TurtleError> {
        self.position = self
            .locations
            .pop()
            .ok_or(TurtleError::EmptyLocationStack)?;
        Ok(())
    }

    pub fn push_rotation(&mut self) {
        self.rotations.push(self.heading);
    }

    pub fn pop_rotation(&mut self) -> Result<(), TurtleError> {
        self.heading = self
            .rotations
            .pop()
            .ok_or(TurtleError::EmptyRotationStack)?;
        Ok(())
    }

    #[inline]
    pub fn cursor(&self) -> Cursor {
        Cursor {
            position: self.position,
            heading: self.heading,
        }
    }
}

/// The point `distance` units from `from` along `heading` degrees.
pub fn advance(from: Point, heading: f64, distance: f64) -> Result<Point, TurtleError> {
    let (s, c) = heading.to_radians().sin_cos();
    finite_point(from + Vec2::new(c, s) * distance, "position")
}

/// Maps any finite angle into `[0, 360)`.
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    ((degrees % 360.0) + 360.0) % 360.0
}

#[inline]
pub(crate) fn finite(value: f64, what: &'static str) -> Result<f64, TurtleError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TurtleError::NonFinite { what })
    }
}

#[inline]
pub(crate) fn finite_point(point: Point, what: &'static str) -> Result<Point, TurtleError> {
    finite(point.x, what)?;
    finite(point.y, what)?;
    Ok(point)
}
