// pathfinder/uturtle/src/ast.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Inspiration for the commands are from https://docs.kde.org/trunk5/en/kdeedu/kturtle/commands.html

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// A single turtle instruction.
///
/// Angles are in degrees. A positive `Turn` rotates clockwise on a canvas
/// whose y axis points down, which is what `turnright` produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Reset,
    Clear,
    Forward(f64),
    Turn(f64),
    Direction(f64),
    PenState(bool),
    SetColor(Color),
    SetWidth(f64),
    /// Absolute move, relative to the canvas centre with y pointing up.
    Go(f64, f64),
    GoX(f64),
    GoY(f64),
    Home,
    Circle { radius: f64, extent: f64 },
    PushLoc,
    PopLoc,
    PushRot,
    PopRot,
    Speed(f64),
    Visible(bool),
}

impl Command {
    #[inline]
    pub fn backward(distance: f64) -> Command {
        Command::Forward(-distance)
    }

    #[inline]
    pub fn left(degrees: f64) -> Command {
        Command::Turn(-degrees)
    }

    #[inline]
    pub fn right(degrees: f64) -> Command {
        Command::Turn(degrees)
    }
}

pub type Script = Vec<Command>;
