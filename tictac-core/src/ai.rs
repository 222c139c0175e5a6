//! Move selectors: random, heuristic, exhaustive search and human prompt

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Mark, Position, CELL_COUNT};
use crate::config::Tier;
use crate::error::MoveError;
use crate::input::MoveSource;
use crate::search::{best_move, win_or_block};

// ============================================================================
// MOVE SELECTOR
// ============================================================================

/// Chooses moves for one mark.
///
/// Holds no game state beyond its tier, mark and RNG; every call is a
/// function of the board it is shown. The board is never modified.
#[derive(Clone, Debug)]
pub struct MoveSelector {
    tier: Tier,
    mark: Mark,
    rng: ChaCha8Rng,
}

impl MoveSelector {
    pub fn new(tier: Tier, mark: Mark) -> Self {
        Self {
            tier,
            mark,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(tier: Tier, mark: Mark, seed: u64) -> Self {
        Self {
            tier,
            mark,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub fn is_human(&self) -> bool {
        self.tier.is_human()
    }

    /// Pick a move on `board`. `input` is only read by human selectors.
    pub fn select_move(
        &mut self,
        board: &Board,
        input: &mut dyn MoveSource,
    ) -> Result<Position, MoveError> {
        let mv = match self.tier {
            Tier::HumanPrompt => self.prompt_move(input)?,
            Tier::Random => self.random_move(board)?,
            Tier::Heuristic => self.heuristic_move(board)?,
            Tier::ExhaustiveSearch => self.search_move(board)?,
        };

        tracing::debug!(tier = %self.tier, mark = %self.mark, position = %mv, "move selected");
        Ok(mv)
    }

    // ========================================================================
    // STRATEGIES
    // ========================================================================

    /// Uniform choice among the legal moves
    fn random_move(&mut self, board: &Board) -> Result<Position, MoveError> {
        board
            .legal_moves()
            .choose(&mut self.rng)
            .copied()
            .ok_or(MoveError::NoLegalMove)
    }

    /// Win, else block, else random
    fn heuristic_move(&mut self, board: &Board) -> Result<Position, MoveError> {
        match win_or_block(board, self.mark) {
            Some(mv) => Ok(mv),
            None => self.random_move(board),
        }
    }

    /// Win or block, random opening, otherwise full minimax
    fn search_move(&mut self, board: &Board) -> Result<Position, MoveError> {
        if let Some(mv) = win_or_block(board, self.mark) {
            return Ok(mv);
        }

        if board.legal_moves().len() == CELL_COUNT {
            return self.random_move(board);
        }

        best_move(board, self.mark).ok_or(MoveError::NoLegalMove)
    }

    /// One raw entry from the human, parsed into a position
    fn prompt_move(&mut self, input: &mut dyn MoveSource) -> Result<Position, MoveError> {
        let line = input.read_move(self.mark).ok_or(MoveError::InputClosed)?;
        Ok(Position::parse(&line)?)
    }
}

// ============================================================================
// TESTS
// ============================================================================
