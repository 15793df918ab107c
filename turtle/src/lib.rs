// pathfinder/turtle/src/lib.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Plays a sequence of Turtle commands onto a canvas.

#[macro_use]
extern crate bitflags;

pub mod canvas;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod raster;
pub mod state;
pub mod svg;

use std::fmt::{Display, Formatter, Result as FormatResult};

pub use crate::canvas::{Canvas, JsonLines, Scene, Segment};
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::TurtleConfig;
pub use crate::engine::{PlaybackState, Turtle};
pub use crate::error::{CanvasError, CommandError, ConfigError, TurtleError};
pub use crate::raster::Raster;
pub use crate::state::{Cursor, Stroke, TurtleState};
pub use uturtle::{Color, Command, Script};

bitflags! {
    // NB: If you change this, make sure to update the `Display`
    // implementation as well.
    /// Non-fatal conditions met while drawing.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DrawFlags: u16 {
        const OFF_CANVAS       = 0x0001;
        const HAIRLINE_CLAMPED = 0x0002;
    }
}

impl Display for DrawFlags {
    fn fmt(&self, formatter: &mut Formatter) -> FormatResult {
        if self.is_empty() {
            return Ok(());
        }

        let mut first = true;
        for (bit, name) in NAMES.iter().enumerate() {
            if (self.bits() >> bit) & 1 == 0 {
                continue;
            }
            if !first {
                formatter.write_str(", ")?;
            } else {
                first = false;
            }
            formatter.write_str(name)?;
        }

        return Ok(());

        // Must match the order in `DrawFlags`.
        static NAMES: &[&str] = &[
            "segment leaves the canvas",
            "stroke clamped to hairline width",
        ];
    }
}

#[test]
fn draw_flags_display() {
    assert_eq!(DrawFlags::empty().to_string(), "");
    assert_eq!(
        DrawFlags::all().to_string(),
        "segment leaves the canvas, stroke clamped to hairline width"
    );
    assert_eq!(
        DrawFlags::HAIRLINE_CLAMPED.to_string(),
        "stroke clamped to hairline width"
    );
}
