// pathfinder/turtle/src/error.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use uturtle::Command;

/// A failure reported by a canvas while drawing.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("failed to write segment: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode segment: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A single turtle operation failed. The turtle state is unchanged, though
/// segments already handed to the canvas stay drawn.
#[derive(Debug, Error)]
pub enum TurtleError {
    #[error("{what} is not finite")]
    NonFinite { what: &'static str },
    #[error("poploc on empty stack")]
    EmptyLocationStack,
    #[error("poprot on empty stack")]
    EmptyRotationStack,
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// A queued command failed during playback. Playback has stopped and the
/// commands after it are still queued.
#[derive(Debug, Error)]
#[error("command {command:?} failed: {source}")]
pub struct CommandError {
    pub command: Command,
    #[source]
    pub source: TurtleError,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
