// pathfinder/uturtle/src/lib.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Turtle command language: the command AST, pen colors, and a parser for
//! KTurtle-style scripts.

#[macro_use]
extern crate lalrpop_util;

pub mod ast;
pub mod color;

lalrpop_mod!(#[allow(clippy::all)] pub turtle); // synthesized by LALRPOP

use lalrpop_util::ParseError;
use thiserror::Error;

pub use crate::ast::{Command, Script};
pub use crate::color::Color;

pub type Parser = turtle::TopLevelParser;

/// Upper bound on a single `repeat` count.
pub const MAX_REPEAT: usize = 10_000;

/// Upper bound on the length of a parsed script, after `repeat` expansion.
pub const MAX_COMMANDS: usize = 1_000_000;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ScriptError {
    #[error("{line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("color channel {0} is not a whole number in 0..=255")]
    ChannelOutOfRange(f64),
    #[error("unknown color {0:?}")]
    UnknownColor(String),
    #[error("repeat count {0} is not a whole number in 0..=10000")]
    BadRepeatCount(f64),
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("script expands to more than 1000000 commands")]
    TooManyCommands,
}

/// Parses a whole script into a flat command list. `repeat` blocks are
/// expanded in place.
pub fn parse(source: &str) -> Result<Script, ScriptError> {
    Parser::new()
        .parse(source)
        .map_err(|error| syntax_error(source, error))
}

fn syntax_error<T: std::fmt::Display>(
    source: &str,
    error: ParseError<usize, T, ScriptError>,
) -> ScriptError {
    let (offset, message) = match error {
        ParseError::User { error } => return error,
        ParseError::InvalidToken { location } => (location, "invalid token".to_owned()),
        ParseError::UnrecognizedEof { location, expected } => (
            location,
            format!("unexpected end of script, expected one of {}", expected.join(", ")),
        ),
        ParseError::UnrecognizedToken {
            token: (start, token, _),
            expected,
        } => (
            start,
            format!("unexpected `{}`, expected one of {}", token, expected.join(", ")),
        ),
        ParseError::ExtraToken {
            token: (start, token, _),
        } => (start, format!("unexpected `{}`", token)),
    };
    let (line, column) = line_column(source, offset);
    ScriptError::Syntax {
        line,
        column,
        message,
    }
}

// 1-based, counting columns in chars.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |index| index + 1);
    (line, before[line_start..].chars().count() + 1)
}

#[test]
fn turtle_command_parser() {
    assert!(turtle::CommandParser::new().parse("penup").is_ok());
    assert!(turtle::CommandParser::new().parse("pendown").is_ok());
    assert!(turtle::CommandParser::new().parse("turnleft").is_ok());
    assert!(turtle::CommandParser::new().parse("turnleft 22.7").is_ok());
    assert!(turtle::CommandParser::new().parse("turnright").is_ok());
    assert!(turtle::CommandParser::new().parse("turnright 12.3").is_ok());
    assert!(turtle::CommandParser::new().parse("pushloc").is_ok());
    assert!(turtle::CommandParser::new().parse("poploc").is_ok());
    assert!(turtle::CommandParser::new().parse("pushrot").is_ok());
    assert!(turtle::CommandParser::new().parse("poprot").is_ok());
    assert!(turtle::CommandParser::new().parse("go 1 3").is_ok());
    assert!(turtle::CommandParser::new().parse("gox 5.3").is_ok());
    assert!(turtle::CommandParser::new().parse("goy 44.2").is_ok());
    assert!(turtle::CommandParser::new().parse("penwidth 2").is_ok());
    assert!(turtle::CommandParser::new()
        .parse("pencolor 255,128 ,    128")
        .is_ok());
    assert!(turtle::CommandParser::new()
        .parse("pencolor \"steelblue\"")
        .is_ok());
    assert!(turtle::CommandParser::new().parse("circle 50").is_ok());
    assert!(turtle::CommandParser::new().parse("circle -50 180").is_ok());
    assert!(turtle::CommandParser::new().parse("speed 5").is_ok());
    assert!(turtle::CommandParser::new().parse("ht").is_ok());

    assert!(turtle::CommandParser::new().parse("bleh").is_err());
    assert!(turtle::CommandParser::new().parse("penup pendown").is_err());
    assert!(turtle::CommandParser::new().parse("pushloc 22").is_err());
    assert!(turtle::CommandParser::new()
        .parse("pencolor 255,128")
        .is_err());
    assert!(turtle::CommandParser::new()
        .parse("pencolor 256,0,0")
        .is_err());
    assert!(turtle::CommandParser::new()
        .parse("pencolor \"no-such-color\"")
        .is_err());
}

#[test]
fn turtle_program_parser() {
    assert!(turtle::TopLevelParser::new()
        .parse("turnright turnright 12.3 turnleft")
        .is_ok());
    assert!(turtle::TopLevelParser::new().parse("").is_ok());
}
