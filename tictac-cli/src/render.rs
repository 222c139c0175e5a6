//! Text rendering of the board

use tictac_core::{Board, Cell, Mark, Position, BOARD_SIZE};

/// Framed grid. Empty cells stay blank until someone has won.
pub fn render(board: &Board) -> String {
    let reveal_empty = board.is_win_for(Mark::X) || board.is_win_for(Mark::O);

    let mut out = String::from("---------\n");
    for row in 0..BOARD_SIZE {
        let cells: Vec<char> = (0..BOARD_SIZE)
            .filter_map(|column| Position::new(row, column))
            .map(|pos| match board.value_at(pos) {
                Cell::Empty if !reveal_empty => ' ',
                cell => cell.symbol(),
            })
            .collect();

        out.push_str("| ");
        for cell in cells {
            out.push(cell);
            out.push(' ');
        }
        out.push_str("|\n");
    }
    out.push_str("---------");
    out
}
