//! This module defines the core vocabulary shared by the rest of the crate: symbols, states,
//! head displacements, transitions, and the crate-level error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::analyzer::AnalysisError;

/// Character used to render the blank symbol in instantaneous descriptions.
pub const BLANK_PLACEHOLDER: char = '_';
/// The maximum allowed size for a machine document in bytes.
pub const MAX_DOCUMENT_SIZE: usize = 1024 * 1024; // 1MB
/// The number of applied transitions after which a run is aborted.
pub const DEFAULT_STEP_LIMIT: usize = 100_000;

/// A token of the tape alphabet.
///
/// The empty text is the blank symbol. Blank is never stored on a [`Tape`](crate::Tape) and is
/// rendered as [`BLANK_PLACEHOLDER`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the blank symbol.
    pub fn blank() -> Self {
        Self(String::new())
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Self(c.to_string())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            write!(f, "{}", BLANK_PLACEHOLDER)
        } else {
            f.write_str(&self.0)
        }
    }
}

/// A state label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(String);

impl State {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for State {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents the possible directions the tape head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Returns the change applied to the head position.
    pub fn offset(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Stay => 0,
        }
    }
}

/// A displacement code as declared by a transition record.
///
/// Unrecognized codes are only kept when the table is built in
/// [`Mode::Lenient`](crate::table::Mode::Lenient); they abort the run that reaches them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Displacement {
    Direction(Direction),
    Unrecognized(String),
}

impl Displacement {
    /// Parses a displacement code. Codes are case-insensitive and an empty code means `Stay`.
    pub fn parse(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "L" => Displacement::Direction(Direction::Left),
            "R" => Displacement::Direction(Direction::Right),
            "S" | "" => Displacement::Direction(Direction::Stay),
            _ => Displacement::Unrecognized(code.to_string()),
        }
    }
}

impl From<Direction> for Displacement {
    fn from(direction: Direction) -> Self {
        Displacement::Direction(direction)
    }
}

/// A single transition rule.
///
/// The rule applies when the machine is in `from_state`, its cache holds `from_cache` and the
/// head reads `read`. Any of the symbol fields may be blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from_state: State,
    pub from_cache: Symbol,
    pub read: Symbol,
    pub to_state: State,
    pub to_cache: Symbol,
    pub write: Symbol,
    pub displacement: Displacement,
}

impl Transition {
    /// The lookup key of this rule.
    pub fn key(&self) -> (State, Symbol, Symbol) {
        (
            self.from_state.clone(),
            self.from_cache.clone(),
            self.read.clone(),
        )
    }
}

/// Errors raised while loading a machine document or building its transition table.
///
/// Simulation outcomes are never errors; see [`Verdict`](crate::machine::Verdict).
#[derive(Debug, Error)]
pub enum MachineError {
    /// The document could not be read.
    #[error("File error: {0}")]
    FileError(String),
    /// The document is not well-formed.
    #[error("Document parsing error: {0}")]
    ParseError(String),
    /// The document is well-formed but describes an invalid machine.
    #[error("Machine validation error: {0}")]
    ValidationError(#[from] AnalysisError),
}
