//! Board geometry: positions, marks and the 3x3 grid

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BoardParseError, CoordinateError, MoveError};

/// Board side length
pub const BOARD_SIZE: usize = 3;

/// Number of cells on the board
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// The 8 winning lines as flat cell indices.
/// Order: rows top-to-bottom, columns left-to-right, main diagonal, anti-diagonal.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

// ============================================================================
// MARKS AND CELLS
// ============================================================================

/// A player's symbol
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Cell state holding this mark
    pub fn cell(self) -> Cell {
        match self {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => f.write_str("X"),
            Mark::O => f.write_str("O"),
        }
    }
}

/// State of a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// Character used by the 9-character board form
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '_',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    fn from_symbol(c: char) -> Result<Self, BoardParseError> {
        match c {
            '_' => Ok(Cell::Empty),
            'X' => Ok(Cell::X),
            'O' => Ok(Cell::O),
            other => Err(BoardParseError::InvalidCell(other)),
        }
    }
}

// ============================================================================
// POSITION
// ============================================================================

/// Zero-based grid coordinates, row 0 at the top
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    row: u8,
    column: u8,
}

impl Position {
    /// Create a position, `None` if either coordinate is off the board
    pub fn new(row: usize, column: usize) -> Option<Self> {
        if row < BOARD_SIZE && column < BOARD_SIZE {
            Some(Self {
                row: row as u8,
                column: column as u8,
            })
        } else {
            None
        }
    }

    /// Position for a flat row-major index. Caller guarantees `index < 9`.
    pub(crate) const fn from_index(index: usize) -> Self {
        Self {
            row: (index / BOARD_SIZE) as u8,
            column: (index % BOARD_SIZE) as u8,
        }
    }

    /// Parse human input "<column> <row>", both 1-based with row 1 at the bottom
    pub fn parse(input: &str) -> Result<Self, CoordinateError> {
        let tokens: Vec<&str> = input.split_whitespace().collect();

        let mut values = Vec::with_capacity(tokens.len());
        for token in &tokens {
            // Integers too large for i64 are still integers, just off the board
            let value = match token.parse::<i64>() {
                Ok(value) => value,
                Err(err) => match err.kind() {
                    IntErrorKind::PosOverflow => i64::MAX,
                    IntErrorKind::NegOverflow => i64::MIN,
                    _ => return Err(CoordinateError::NonIntegerInput(token.to_string())),
                },
            };
            values.push(value);
        }

        if let Some(&bad) = values.iter().find(|v| !(1..=3).contains(*v)) {
            return Err(CoordinateError::CoordinateOutOfRange(bad));
        }

        match values.as_slice() {
            &[column, row] => Ok(Self {
                row: (BOARD_SIZE as i64 - row) as u8,
                column: (column - 1) as u8,
            }),
            other => Err(CoordinateError::WrongTokenCount(other.len())),
        }
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn column(&self) -> usize {
        self.column as usize
    }

    /// Flat row-major index
    pub fn index(&self) -> usize {
        self.row() * BOARD_SIZE + self.column()
    }

    /// All 9 positions in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELL_COUNT).map(Position::from_index)
    }
}

impl FromStr for Position {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::parse(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.column)
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// 3x3 grid stored row-major. Copies are independent snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value_at(&self, pos: Position) -> Cell {
        self.cells[pos.index()]
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.value_at(pos) != Cell::Empty
    }

    /// Place `mark` at `pos`; the board is untouched on error
    pub fn apply_move(&mut self, pos: Position, mark: Mark) -> Result<(), MoveError> {
        if self.is_occupied(pos) {
            return Err(MoveError::OccupiedCell(pos));
        }
        self.cells[pos.index()] = mark.cell();
        Ok(())
    }

    pub fn has_empty_cell(&self) -> bool {
        self.cells.contains(&Cell::Empty)
    }

    pub fn count_marks(&self, mark: Mark) -> usize {
        let cell = mark.cell();
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// True if any row, column or diagonal is entirely `mark`
    pub fn is_win_for(&self, mark: Mark) -> bool {
        let cell = mark.cell();
        LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.cells[i] == cell))
    }

    /// Empty positions in row-major order
    pub fn legal_moves(&self) -> Vec<Position> {
        Position::all().filter(|&p| !self.is_occupied(p)).collect()
    }

    /// Mark counts differ by at most one and at most one mark has a line
    pub fn is_consistent(&self) -> bool {
        let x = self.count_marks(Mark::X);
        let o = self.count_marks(Mark::O);
        x.abs_diff(o) <= 1 && !(self.is_win_for(Mark::X) && self.is_win_for(Mark::O))
    }

    /// Copy with `mark` placed at `pos`. Only for positions from `legal_moves()`.
    pub(crate) fn with_move(&self, pos: Position, mark: Mark) -> Board {
        let mut next = *self;
        next.cells[pos.index()] = mark.cell();
        next
    }

    /// The cells of one line, in line order
    pub(crate) fn line_cells(&self, line: &[usize; 3]) -> [Cell; 3] {
        [self.cells[line[0]], self.cells[line[1]], self.cells[line[2]]]
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    /// Parse the 9-character row-major form, e.g. `"XX_OO____"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != CELL_COUNT {
            return Err(BoardParseError::WrongLength(chars.len()));
        }

        let mut cells = [Cell::Empty; CELL_COUNT];
        for (cell, &c) in cells.iter_mut().zip(&chars) {
            *cell = Cell::from_symbol(c)?;
        }
        Ok(Self { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.symbol())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, column: usize) -> Position {
        Position::new(row, column).unwrap()
    }

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(0, 0).is_some());
        assert!(Position::new(2, 2).is_some());
        assert!(Position::new(3, 0).is_none());
        assert!(Position::new(0, 3).is_none());
    }

    #[test]
    fn test_parse_translates_to_grid() {
        // column 2, row 1 (bottom)
        assert_eq!(Position::parse("2 1").unwrap(), pos(2, 1));
        assert_eq!(Position::parse("1 3").unwrap(), pos(0, 0));
        assert_eq!(Position::parse("  3   3 ").unwrap(), pos(0, 2));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Position::parse("a 1"),
            Err(CoordinateError::NonIntegerInput("a".to_string()))
        );
        assert_eq!(
            Position::parse("1 4"),
            Err(CoordinateError::CoordinateOutOfRange(4))
        );
        assert_eq!(
            Position::parse("0 2"),
            Err(CoordinateError::CoordinateOutOfRange(0))
        );
        assert_eq!(
            Position::parse("99999999999999999999 1"),
            Err(CoordinateError::CoordinateOutOfRange(i64::MAX))
        );
        assert_eq!(
            Position::parse("2 -99999999999999999999"),
            Err(CoordinateError::CoordinateOutOfRange(i64::MIN))
        );
        assert_eq!(Position::parse("2"), Err(CoordinateError::WrongTokenCount(1)));
        assert_eq!(Position::parse(""), Err(CoordinateError::WrongTokenCount(0)));
        assert_eq!(
            Position::parse("1 2 3"),
            Err(CoordinateError::WrongTokenCount(3))
        );
    }

    #[test]
    fn test_empty_board() {
        let board = Board::new();
        assert!(board.has_empty_cell());
        assert!(!board.is_win_for(Mark::X));
        assert!(!board.is_win_for(Mark::O));
        assert_eq!(board.legal_moves().len(), 9);
        assert_eq!(board.count_marks(Mark::X), 0);
    }

    #[test]
    fn test_apply_move_occupied() {
        let mut board = Board::new();
        board.apply_move(pos(1, 1), Mark::X).unwrap();
        let before = board;

        let err = board.apply_move(pos(1, 1), Mark::O).unwrap_err();
        assert_eq!(err, MoveError::OccupiedCell(pos(1, 1)));
        assert_eq!(board, before);
        assert_eq!(board.value_at(pos(1, 1)), Cell::X);
    }

    #[test]
    fn test_every_line_wins() {
        for line in LINES {
            let mut board = Board::new();
            for &i in &line {
                board.apply_move(Position::from_index(i), Mark::O).unwrap();
            }
            assert!(board.is_win_for(Mark::O), "line {:?}", line);
            assert!(!board.is_win_for(Mark::X));
        }
    }

    #[test]
    fn test_mixed_line_is_not_win() {
        let board: Board = "XXO______".parse().unwrap();
        assert!(!board.is_win_for(Mark::X));
        assert!(!board.is_win_for(Mark::O));
    }

    #[test]
    fn test_legal_moves_row_major() {
        let board: Board = "X___O___X".parse().unwrap();
        let moves: Vec<usize> = board.legal_moves().iter().map(|p| p.index()).collect();
        assert_eq!(moves, vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn test_copy_is_independent() {
        let original = Board::new();
        let mut copy = original;
        copy.apply_move(pos(0, 0), Mark::X).unwrap();
        assert!(!original.is_occupied(pos(0, 0)));
        assert!(copy.is_occupied(pos(0, 0)));
    }

    #[test]
    fn test_board_string_form() {
        let board: Board = "XX_OO____".parse().unwrap();
        assert_eq!(board.to_string(), "XX_OO____");
        assert_eq!(board.count_marks(Mark::X), 2);
        assert_eq!(board.count_marks(Mark::O), 2);
        assert_eq!("XX".parse::<Board>(), Err(BoardParseError::WrongLength(2)));
        assert_eq!(
            "XX_OO___Z".parse::<Board>(),
            Err(BoardParseError::InvalidCell('Z'))
        );
    }

    #[test]
    fn test_consistency() {
        assert!(Board::new().is_consistent());
        assert!("XX_O_____".parse::<Board>().unwrap().is_consistent());
        assert!(!"XXX______".parse::<Board>().unwrap().is_consistent());
        assert!(!"XXXOOO___".parse::<Board>().unwrap().is_consistent());
    }
}
