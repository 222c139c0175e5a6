//! Error types for move entry, match play and configuration

use thiserror::Error;

use crate::board::{Mark, Position};
use crate::config::Tier;

/// Malformed or out-of-range human coordinates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("You should enter numbers!")]
    NonIntegerInput(String),

    #[error("Coordinates should be from 1 to 3!")]
    CoordinateOutOfRange(i64),

    #[error("You should enter two numbers!")]
    WrongTokenCount(usize),
}

/// A rejected move
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("This cell is occupied! Choose another one!")]
    OccupiedCell(Position),

    #[error(transparent)]
    InvalidCoordinates(#[from] CoordinateError),

    #[error("no legal move left")]
    NoLegalMove,

    #[error("input closed")]
    InputClosed,
}

impl MoveError {
    /// Whether a human may simply try again
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MoveError::OccupiedCell(_) | MoveError::InvalidCoordinates(_)
        )
    }
}

/// Faults that stop a match before it reaches a terminal state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// An automated selector produced a move the board refused
    #[error("{tier} selector for {mark} proposed an illegal move: {source}")]
    IllegalMove {
        tier: Tier,
        mark: Mark,
        #[source]
        source: MoveError,
    },

    #[error("input closed while waiting for {0}'s move")]
    InputClosed(Mark),

    #[error("match is already finished")]
    AlreadyFinished,
}

/// Operator errors in the command surface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("unknown player kind: {0:?} (expected user, easy, medium or hard)")]
    UnknownPlayerKind(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("{0} requires interactive input")]
    HumanNotAllowed(Mark),
}

/// Failure to read a board from its 9-character form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardParseError {
    #[error("board must have 9 cells, got {0}")]
    WrongLength(usize),

    #[error("invalid cell character {0:?} (expected X, O or _)")]
    InvalidCell(char),
}
