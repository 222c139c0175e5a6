//! TICTAC Core - Rules engine and move selection
//!
//! This crate provides the game logic for tic-tac-toe:
//! - Board geometry (3x3 grid, 8 winning lines)
//! - Move selectors (random, heuristic, exhaustive minimax, human input)
//! - Match state machine with terminal and validity detection
//! - Coordinate parsing for human entries

pub mod board;
pub mod error;
pub mod search;
pub mod ai;
pub mod game;
pub mod input;
pub mod config;

// Re-exports for convenient access
pub use board::{Board, Cell, Mark, Position, BOARD_SIZE, CELL_COUNT, LINES};
pub use error::{BoardParseError, ConfigError, CoordinateError, MatchError, MoveError};
pub use search::{best_move, completing_move, minimax, win_or_block};
pub use ai::MoveSelector;
pub use game::{evaluate, Match, MatchState, Outcome};
pub use input::{MoveSource, NoInput, ScriptedInput};
pub use config::{MatchConfig, Tier};
