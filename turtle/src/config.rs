// pathfinder/turtle/src/config.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Canvas and playback settings.

use crate::error::ConfigError;
use crate::raster::MAX_SIDE;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use uturtle::Color;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TurtleConfig {
    pub width: f64,
    pub height: f64,
    pub background: Color,
    pub pen_color: Color,
    pub pen_width: f64,
    /// Playback speed factor. Each command waits `base_delay_ms / speed`;
    /// zero or less means no delay.
    pub speed: f64,
    pub base_delay_ms: u64,
}

impl Default for TurtleConfig {
    fn default() -> TurtleConfig {
        TurtleConfig {
            width: 800.0,
            height: 600.0,
            background: Color::WHITE,
            pen_color: Color::BLACK,
            pen_width: 1.0,
            speed: 1.0,
            base_delay_ms: 100,
        }
    }
}

impl TurtleConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<TurtleConfig, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config: TurtleConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let side = |value: f64| value.is_finite() && value > 0.0 && value <= MAX_SIDE as f64;
        if !side(self.width) || !side(self.height) {
            return Err(ConfigError::Invalid(format!(
                "canvas size {}x{} must be positive and at most {} per side",
                self.width, self.height, MAX_SIDE
            )));
        }
        if !self.pen_width.is_finite() || self.pen_width < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "pen width {} must be a non-negative number",
                self.pen_width
            )));
        }
        if self.speed.is_nan() {
            return Err(ConfigError::Invalid("speed must be a number".to_owned()));
        }
        Ok(())
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}
