//! Line scanning and exhaustive minimax search
//!
//! Everything here is a pure function of the board and the searching mark.
//! Children are built on board copies, so the caller's board is never touched.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::board::{Board, Cell, Mark, Position, LINES};

/// Score of a finished game won by the searching mark
pub const WIN_SCORE: i32 = 10;

/// Score of a finished game lost by the searching mark
pub const LOSS_SCORE: i32 = -WIN_SCORE;

/// Score of a drawn game
pub const DRAW_SCORE: i32 = 0;

// ============================================================================
// LINE SCAN
// ============================================================================

/// Empty cell of the first line holding two of `mark` and one empty cell.
///
/// Lines are scanned rows top-to-bottom, columns left-to-right, main
/// diagonal, then anti-diagonal.
pub fn completing_move(board: &Board, mark: Mark) -> Option<Position> {
    let own = mark.cell();

    LINES.iter().find_map(|line| {
        let cells = board.line_cells(line);
        let owned = cells.iter().filter(|&&c| c == own).count();
        let empty = cells.iter().position(|&c| c == Cell::Empty);

        match (owned, empty) {
            (2, Some(slot)) => Some(Position::from_index(line[slot])),
            _ => None,
        }
    })
}

/// Winning move for `mark`, else a move blocking the opponent's win
pub fn win_or_block(board: &Board, mark: Mark) -> Option<Position> {
    completing_move(board, mark).or_else(|| completing_move(board, mark.opponent()))
}

// ============================================================================
// MINIMAX
// ============================================================================

/// Score of a terminal board from `me`'s point of view, `None` if play continues
fn terminal_score(board: &Board, me: Mark) -> Option<i32> {
    if board.is_win_for(me) {
        Some(WIN_SCORE)
    } else if board.is_win_for(me.opponent()) {
        Some(LOSS_SCORE)
    } else if !board.has_empty_cell() {
        Some(DRAW_SCORE)
    } else {
        None
    }
}

/// Minimax value of `board` with `to_move` about to play, scored for `me`
pub fn minimax(board: &Board, to_move: Mark, me: Mark) -> i32 {
    if let Some(score) = terminal_score(board, me) {
        return score;
    }

    let scores = board
        .legal_moves()
        .into_iter()
        .map(|mv| minimax(&board.with_move(mv, to_move), to_move.opponent(), me));

    if to_move == me {
        scores.max().unwrap_or(DRAW_SCORE)
    } else {
        scores.min().unwrap_or(DRAW_SCORE)
    }
}

/// Value of playing `mv` as `me`
fn score_move(board: &Board, mv: Position, me: Mark) -> i32 {
    minimax(&board.with_move(mv, me), me.opponent(), me)
}

/// Minimax scores for every legal move, in `legal_moves()` order
pub fn score_moves(board: &Board, me: Mark) -> Vec<(Position, i32)> {
    let moves = board.legal_moves();

    #[cfg(feature = "parallel")]
    let scores: Vec<i32> = moves.par_iter().map(|&mv| score_move(board, mv, me)).collect();

    #[cfg(not(feature = "parallel"))]
    let scores: Vec<i32> = moves.iter().map(|&mv| score_move(board, mv, me)).collect();

    moves.into_iter().zip(scores).collect()
}

/// Best move for `me`; ties go to the earliest move in `legal_moves()` order
pub fn best_move(board: &Board, me: Mark) -> Option<Position> {
    let mut best: Option<(Position, i32)> = None;

    for (mv, score) in score_moves(board, me) {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((mv, score)),
        }
    }

    best.map(|(mv, _)| mv)
}
