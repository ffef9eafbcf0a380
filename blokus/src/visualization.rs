use crate::{Board, Orientation, Piece, PlayerColor, STARTING_CELLS};

fn color_char(color: PlayerColor) -> char {
    match color {
        PlayerColor::First => 'O',
        PlayerColor::Second => 'B',
    }
}

/// Draws the board as text, one character pair per cell.
///
/// `O` and `B` are the cells of the orange and blue player, `·` marks an
/// empty starting cell.
pub fn visualize_board(board: &Board) -> String {
    // Draw the column numbers and the top of the box
    let mut result = String::from("    ");
    for col in 0..board.width() {
        result += &format!("{:>2}", col % 100);
    }
    result += "\n    ╭";
    for _ in 0..board.width() {
        result += "──";
    }
    result += "╮\n";

    for row in 0..board.height() as i8 {
        result += &format!("{:>3} │", row);
        for col in 0..board.width() as i8 {
            let symbol = match board.get(row, col) {
                Some(color) => color_char(color),
                None if STARTING_CELLS.contains(&(row, col)) => '·',
                None => ' ',
            };
            result.push(symbol);
            result.push(' ');
        }
        result += "│\n";
    }

    // Draw the bottom of the box
    result += "    ╰";
    for _ in 0..board.width() {
        result += "──";
    }
    result += "╯";
    result
}

/// Draws a piece as it looks with `orientation`, `C` being the pivot.
pub fn visualize_piece(piece: &Piece, orientation: Orientation) -> String {
    let cells: Vec<(i8, i8)> = piece.cells(orientation, (0, 0)).collect();
    let (mut i_min, mut i_max, mut j_min, mut j_max) = (0, 0, 0, 0);
    for &(i, j) in &cells {
        i_min = i_min.min(i);
        i_max = i_max.max(i);
        j_min = j_min.min(j);
        j_max = j_max.max(j);
    }

    let mut lines = Vec::new();
    for i in i_min..=i_max {
        let mut line = String::new();
        for j in j_min..=j_max {
            line.push(if (i, j) == (0, 0) {
                'C'
            } else if cells.contains(&(i, j)) {
                'X'
            } else {
                ' '
            });
        }
        lines.push(line.trim_end().to_owned());
    }
    lines.join("\n")
}
