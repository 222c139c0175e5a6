//! Match state machine: alternating turns, legality and terminal detection

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ai::MoveSelector;
use crate::board::{Board, Mark, Position};
use crate::config::{MatchConfig, Tier};
use crate::error::{MatchError, MoveError};
use crate::input::MoveSource;

// ============================================================================
// CORE TYPES
// ============================================================================

/// How a finished game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    XWins,
    OWins,
    Draw,
    /// The board could not have arisen from legal play
    InvalidState,
}

impl Outcome {
    pub fn winner(self) -> Option<Mark> {
        match self {
            Outcome::XWins => Some(Mark::X),
            Outcome::OWins => Some(Mark::O),
            Outcome::Draw | Outcome::InvalidState => None,
        }
    }

    pub fn win_for(mark: Mark) -> Self {
        match mark {
            Mark::X => Outcome::XWins,
            Mark::O => Outcome::OWins,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::XWins => f.write_str("X wins"),
            Outcome::OWins => f.write_str("O wins"),
            Outcome::Draw => f.write_str("Draw"),
            Outcome::InvalidState => f.write_str("Impossible"),
        }
    }
}

/// Match progress
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    InProgress,
    Finished(Outcome),
}

impl MatchState {
    pub fn is_finished(self) -> bool {
        matches!(self, MatchState::Finished(_))
    }

    pub fn outcome(self) -> Option<Outcome> {
        match self {
            MatchState::InProgress => None,
            MatchState::Finished(outcome) => Some(outcome),
        }
    }
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchState::InProgress => f.write_str("Game not finished"),
            MatchState::Finished(outcome) => outcome.fmt(f),
        }
    }
}

/// Terminal status of a board, `InProgress` if play continues.
/// Boards that fail `Board::is_consistent` are `InvalidState`.
pub fn evaluate(board: &Board) -> MatchState {
    if !board.is_consistent() {
        return MatchState::Finished(Outcome::InvalidState);
    }

    let x_wins = board.is_win_for(Mark::X);
    let o_wins = board.is_win_for(Mark::O);

    match (x_wins, o_wins) {
        (true, true) => MatchState::Finished(Outcome::InvalidState),
        (true, false) => MatchState::Finished(Outcome::XWins),
        (false, true) => MatchState::Finished(Outcome::OWins),
        (false, false) if !board.has_empty_cell() => MatchState::Finished(Outcome::Draw),
        (false, false) => MatchState::InProgress,
    }
}

// ============================================================================
// MATCH
// ============================================================================

/// One game between two selectors
#[derive(Clone, Debug)]
pub struct Match {
    board: Board,
    player_x: MoveSelector,
    player_o: MoveSelector,
    to_move: Mark,
    state: MatchState,
    history: Vec<(Mark, Position)>,
}

impl Match {
    /// Fresh game on an empty board, X to move
    pub fn new(player_x: MoveSelector, player_o: MoveSelector) -> Self {
        Self {
            board: Board::new(),
            player_x,
            player_o,
            to_move: Mark::X,
            state: MatchState::InProgress,
            history: Vec::new(),
        }
    }

    /// Fresh game from a configuration
    pub fn from_config(config: &MatchConfig) -> Self {
        let (player_x, player_o) = config.selectors();
        Self::new(player_x, player_o)
    }

    /// Game continuing from a pre-populated board.
    ///
    /// Inconsistent boards finish immediately as `InvalidState`; decided
    /// boards finish with their outcome. Otherwise X moves when the counts
    /// are level and O when X is one ahead.
    pub fn with_board(board: Board, player_x: MoveSelector, player_o: MoveSelector) -> Self {
        let x = board.count_marks(Mark::X);
        let o = board.count_marks(Mark::O);

        let state = evaluate(&board);
        if state == MatchState::Finished(Outcome::InvalidState) {
            tracing::warn!(board = %board, "rejecting inconsistent starting board");
        }

        Self {
            board,
            player_x,
            player_o,
            to_move: if x > o { Mark::O } else { Mark::X },
            state,
            history: Vec::new(),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Mark whose turn it is
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    pub fn selector(&self, mark: Mark) -> &MoveSelector {
        match mark {
            Mark::X => &self.player_x,
            Mark::O => &self.player_o,
        }
    }

    /// Moves played so far in this match
    pub fn history(&self) -> &[(Mark, Position)] {
        &self.history
    }

    // ========================================================================
    // PLAY
    // ========================================================================

    /// Play one half-turn and return the resulting state.
    ///
    /// Human entries the board refuses are handed back to `input` and
    /// re-prompted. Any other selector proposing an illegal move is a fault.
    pub fn step(&mut self, input: &mut dyn MoveSource) -> Result<MatchState, MatchError> {
        if self.state.is_finished() {
            return Err(MatchError::AlreadyFinished);
        }

        let mark = self.to_move;
        let position = self.next_move(input)?;

        self.history.push((mark, position));
        self.state = evaluate(&self.board);

        match self.state {
            MatchState::InProgress => self.to_move = mark.opponent(),
            MatchState::Finished(outcome) => {
                tracing::info!(%outcome, moves = self.history.len(), "match finished");
            }
        }

        Ok(self.state)
    }

    /// Play until the game is decided
    pub fn play(&mut self, input: &mut dyn MoveSource) -> Result<Outcome, MatchError> {
        loop {
            if let MatchState::Finished(outcome) = self.state {
                return Ok(outcome);
            }
            self.step(input)?;
        }
    }

    /// Ask the active selector until the board accepts its move
    fn next_move(&mut self, input: &mut dyn MoveSource) -> Result<Position, MatchError> {
        let mark = self.to_move;
        let selector = match mark {
            Mark::X => &mut self.player_x,
            Mark::O => &mut self.player_o,
        };
        let tier = selector.tier();

        loop {
            let attempt = selector
                .select_move(&self.board, input)
                .and_then(|pos| self.board.apply_move(pos, mark).map(|()| pos));

            match attempt {
                Ok(pos) => return Ok(pos),
                Err(MoveError::InputClosed) => return Err(MatchError::InputClosed(mark)),
                Err(err) if tier == Tier::HumanPrompt && err.is_recoverable() => {
                    tracing::warn!(%mark, error = %err, "rejected human move");
                    input.reject(&err);
                }
                Err(source) => {
                    tracing::error!(%tier, %mark, error = %source, "selector proposed an illegal move");
                    return Err(MatchError::IllegalMove { tier, mark, source });
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::error::CoordinateError;
    use crate::input::{NoInput, ScriptedInput};

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn ai(tier: Tier, mark: Mark, seed: u64) -> MoveSelector {
        MoveSelector::with_seed(tier, mark, seed)
    }

    fn human(mark: Mark) -> MoveSelector {
        MoveSelector::new(Tier::HumanPrompt, mark)
    }

    #[test]
    fn test_evaluate() {
        assert_eq!(evaluate(&Board::new()), MatchState::InProgress);
        assert_eq!(evaluate(&board("XXXOO____")), MatchState::Finished(Outcome::XWins));
        assert_eq!(evaluate(&board("XX_OOOX_X")), MatchState::Finished(Outcome::OWins));
        assert_eq!(evaluate(&board("XOXXOOOXX")), MatchState::Finished(Outcome::Draw));
        assert_eq!(
            evaluate(&board("XXXOOO___")),
            MatchState::Finished(Outcome::InvalidState)
        );
    }

    #[test]
    fn test_evaluate_rejects_count_skew() {
        // X two ahead with no line, and X two ahead with a line
        assert_eq!(
            evaluate(&board("XX_______")),
            MatchState::Finished(Outcome::InvalidState)
        );
        assert_eq!(
            evaluate(&board("XXXX_O___")),
            MatchState::Finished(Outcome::InvalidState)
        );
        // O ahead of X
        assert_eq!(
            evaluate(&board("OO_______")),
            MatchState::Finished(Outcome::InvalidState)
        );
        assert_eq!(
            MatchState::Finished(Outcome::InvalidState).to_string(),
            "Impossible"
        );
    }

    #[test]
    fn test_status_text() {
        assert_eq!(MatchState::InProgress.to_string(), "Game not finished");
        assert_eq!(MatchState::Finished(Outcome::XWins).to_string(), "X wins");
        assert_eq!(MatchState::Finished(Outcome::OWins).to_string(), "O wins");
        assert_eq!(MatchState::Finished(Outcome::Draw).to_string(), "Draw");
        assert_eq!(MatchState::Finished(Outcome::InvalidState).to_string(), "Impossible");
    }

    #[test]
    fn test_x_moves_first_and_turns_alternate() {
        let mut game = Match::new(ai(Tier::Random, Mark::X, 1), ai(Tier::Random, Mark::O, 2));
        assert_eq!(game.to_move(), Mark::X);

        game.step(&mut NoInput).unwrap();
        assert_eq!(game.board().count_marks(Mark::X), 1);
        assert_eq!(game.to_move(), Mark::O);

        game.step(&mut NoInput).unwrap();
        assert_eq!(game.board().count_marks(Mark::O), 1);
        assert_eq!(game.to_move(), Mark::X);

        let marks: Vec<Mark> = game.history().iter().map(|&(m, _)| m).collect();
        assert_eq!(marks, vec![Mark::X, Mark::O]);
    }

    #[test]
    fn test_human_game_with_retries() {
        // X: top row via human input; O: bottom-left corner moves
        let mut input = ScriptedInput::new([
            "1 3",   // X (0,0)
            "1 1",   // O (2,0)
            "a b",   // X: not numbers
            "1 3",   // X: occupied
            "4 3",   // X: out of range
            "2 3",   // X (0,1)
            "2 1",   // O (2,1)
            "3 3",   // X (0,2) wins
        ]);
        let mut game = Match::new(human(Mark::X), human(Mark::O));

        let outcome = game.play(&mut input).unwrap();
        assert_eq!(outcome, Outcome::XWins);
        assert_eq!(game.history().len(), 5);
        assert_eq!(
            input.rejections(),
            &[
                MoveError::InvalidCoordinates(CoordinateError::NonIntegerInput("a".to_string())),
                MoveError::OccupiedCell(Position::new(0, 0).unwrap()),
                MoveError::InvalidCoordinates(CoordinateError::CoordinateOutOfRange(4)),
            ]
        );
    }

    #[test]
    fn test_rejected_human_move_leaves_board_unchanged() {
        let start = board("X___O____");
        let mut game = Match::with_board(start, human(Mark::X), human(Mark::O));
        let mut input = ScriptedInput::new(["1 3", "2 2", "3 3"]);

        game.step(&mut input).unwrap();

        assert_eq!(input.rejections().len(), 2);
        assert_eq!(game.board().value_at(Position::new(0, 2).unwrap()), Cell::X);
        assert_eq!(game.board().count_marks(Mark::X), 2);
        assert_eq!(game.board().count_marks(Mark::O), 1);
    }

    #[test]
    fn test_input_closed() {
        let mut game = Match::new(human(Mark::X), ai(Tier::Random, Mark::O, 1));
        assert_eq!(game.step(&mut NoInput), Err(MatchError::InputClosed(Mark::X)));
        assert_eq!(game.state(), MatchState::InProgress);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_step_after_finish_fails() {
        let mut game = Match::with_board(
            board("XOXXOO_XO"),
            ai(Tier::Random, Mark::X, 1),
            ai(Tier::Random, Mark::O, 1),
        );
        assert_eq!(game.state(), MatchState::InProgress);
        assert_eq!(game.to_move(), Mark::X);
        assert!(game.step(&mut NoInput).unwrap().is_finished());
        assert_eq!(game.step(&mut NoInput), Err(MatchError::AlreadyFinished));
    }

    #[test]
    fn test_automated_illegal_move_is_fatal() {
        let mut game = Match::new(ai(Tier::Random, Mark::X, 1), ai(Tier::Random, Mark::O, 1));
        // A board with no room left while the match still expects a move
        game.board = board("XOXXOOOXX");
        assert_eq!(game.state(), MatchState::InProgress);

        assert_eq!(
            game.step(&mut NoInput),
            Err(MatchError::IllegalMove {
                tier: Tier::Random,
                mark: Mark::X,
                source: MoveError::NoLegalMove,
            })
        );
        assert!(game.history().is_empty());
        assert_eq!(game.state(), MatchState::InProgress);
        assert_eq!(game.to_move(), Mark::X);
    }

    #[test]
    fn test_inconsistent_start_is_invalid() {
        let game = Match::with_board(
            board("XXX_O____"),
            ai(Tier::Random, Mark::X, 1),
            ai(Tier::Random, Mark::O, 1),
        );
        assert_eq!(game.state(), MatchState::Finished(Outcome::InvalidState));

        let game = Match::with_board(
            board("XX_______"),
            ai(Tier::Random, Mark::X, 1),
            ai(Tier::Random, Mark::O, 1),
        );
        assert_eq!(game.state(), MatchState::Finished(Outcome::InvalidState));
    }

    #[test]
    fn test_with_board_picks_mover() {
        let game = Match::with_board(
            board("X________"),
            ai(Tier::Random, Mark::X, 1),
            ai(Tier::Random, Mark::O, 1),
        );
        assert_eq!(game.to_move(), Mark::O);

        let game = Match::with_board(
            board("XO_______"),
            ai(Tier::Random, Mark::X, 1),
            ai(Tier::Random, Mark::O, 1),
        );
        assert_eq!(game.to_move(), Mark::X);
    }

    #[test]
    fn test_decided_start_reports_outcome() {
        let game = Match::with_board(
            board("XXXOO____"),
            ai(Tier::Random, Mark::X, 1),
            ai(Tier::Random, Mark::O, 1),
        );
        assert_eq!(game.state(), MatchState::Finished(Outcome::XWins));
    }

    #[test]
    fn test_search_finishes_winning_board() {
        let mut game = Match::with_board(
            board("XX_OO____"),
            ai(Tier::ExhaustiveSearch, Mark::X, 1),
            ai(Tier::ExhaustiveSearch, Mark::O, 1),
        );
        assert_eq!(game.play(&mut NoInput).unwrap(), Outcome::XWins);
        assert_eq!(game.history(), &[(Mark::X, Position::new(0, 2).unwrap())]);
    }

    #[test]
    fn test_random_games_keep_counts_balanced() {
        for seed in 0..200 {
            let mut game = Match::from_config(
                &MatchConfig::new(Tier::Random, Tier::Random).with_seed(seed),
            );
            while !game.state().is_finished() {
                game.step(&mut NoInput).unwrap();
                let x = game.board().count_marks(Mark::X);
                let o = game.board().count_marks(Mark::O);
                assert!(x == o || x == o + 1, "seed {}: x={} o={}", seed, x, o);
            }
            assert_ne!(game.state(), MatchState::Finished(Outcome::InvalidState));
        }
    }
}
