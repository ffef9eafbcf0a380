use serde::{Deserialize, Serialize};

use crate::{BoardDecodeError, InvalidPlayerColor};

pub const BOARD_WIDTH: usize = 14;
pub const BOARD_HEIGHT: usize = 14;

/// The cells on which [`PlayerColor::First`] and [`PlayerColor::Second`] start.
pub const STARTING_CELLS: [(i8, i8); 2] = [(4, 4), (9, 9)];

/// Wire value of a cell that is not covered by any piece.
pub const EMPTY_CELL: i8 = -1;

/// Cells are addressed with `i8`, which bounds the number of rows and columns.
pub const MAX_BOARD_SIDE: usize = i8::MAX as usize;

/// One of the two players. Serializes as its index, 0 or 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum PlayerColor {
    /// Orange, makes the first move.
    First,
    /// Blue.
    Second,
}

impl PlayerColor {
    /// Both colors, in play order.
    pub const ALL: [PlayerColor; 2] = [PlayerColor::First, PlayerColor::Second];

    pub fn index(self) -> usize {
        match self {
            PlayerColor::First => 0,
            PlayerColor::Second => 1,
        }
    }

    pub fn opponent(self) -> PlayerColor {
        match self {
            PlayerColor::First => PlayerColor::Second,
            PlayerColor::Second => PlayerColor::First,
        }
    }

    /// The player whose turn it is `increment` turns after this player's.
    /// Negative increments go backwards.
    #[must_use]
    pub fn advance(self, increment: i32) -> PlayerColor {
        let num_players = Self::ALL.len() as i32;
        let idx = (self.index() as i32 + increment.rem_euclid(num_players)) % num_players;
        Self::ALL[idx as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerColor::First => "orange",
            PlayerColor::Second => "blue",
        }
    }
}

impl TryFrom<i8> for PlayerColor {
    type Error = InvalidPlayerColor;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PlayerColor::First),
            1 => Ok(PlayerColor::Second),
            _ => Err(InvalidPlayerColor(value)),
        }
    }
}

impl From<PlayerColor> for i8 {
    fn from(color: PlayerColor) -> i8 {
        color.index() as i8
    }
}

impl std::fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The occupancy of every cell of the board.
///
/// On the wire, this is a list of rows, and every cell is either -1 (empty)
/// or the index of the [`PlayerColor`] covering it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i8>>", into = "Vec<Vec<i8>>")]
pub struct Board {
    width: usize,
    height: usize,
    /// Row-major, `width * height` entries.
    cells: Vec<Option<PlayerColor>>,
}

impl Board {
    /// An empty board of the standard size.
    pub fn empty() -> Self {
        Self::with_size(BOARD_WIDTH, BOARD_HEIGHT)
    }

    /// An empty board. Panics if either dimension is zero or above [`MAX_BOARD_SIDE`].
    pub fn with_size(width: usize, height: usize) -> Self {
        assert!((1..=MAX_BOARD_SIDE).contains(&width) && (1..=MAX_BOARD_SIDE).contains(&height));
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_in_bounds(&self, row: i8, col: i8) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// The color covering a cell. Out-of-bounds cells are empty.
    pub fn get(&self, row: i8, col: i8) -> Option<PlayerColor> {
        if self.is_in_bounds(row, col) {
            self.cells[row as usize * self.width + col as usize]
        } else {
            None
        }
    }

    /// Returns a copy of the board with one cell changed.
    ///
    /// Panics if the cell is out of bounds.
    #[must_use]
    pub fn with_cell(&self, row: i8, col: i8, color: Option<PlayerColor>) -> Self {
        assert!(self.is_in_bounds(row, col), "({}, {}) is not on the board", row, col);
        let mut board = self.clone();
        board.cells[row as usize * self.width + col as usize] = color;
        board
    }

    /// The covered cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = ((i8, i8), PlayerColor)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.map(|color| (((idx / width) as i8, (idx % width) as i8), color))
        })
    }

    /// Number of cells covered by `color`.
    pub fn count(&self, color: PlayerColor) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(color)).count()
    }

    /// Decodes the wire encoding of a board.
    pub fn from_wire(rows: &[Vec<i8>]) -> Result<Self, BoardDecodeError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(BoardDecodeError::Empty);
        }
        if width > MAX_BOARD_SIDE || rows.len() > MAX_BOARD_SIDE {
            return Err(BoardDecodeError::TooLarge {
                width,
                height: rows.len(),
            });
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(BoardDecodeError::NotRectangular {
                    row,
                    len: values.len(),
                    expected: width,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                let cell = match value {
                    EMPTY_CELL => None,
                    _ => Some(
                        PlayerColor::try_from(value)
                            .map_err(|_| BoardDecodeError::InvalidCell { row, col, value })?,
                    ),
                };
                cells.push(cell);
            }
        }
        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// The wire encoding of the board, see [`Board::from_wire`].
    pub fn to_wire(&self) -> Vec<Vec<i8>> {
        self.cells
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or(EMPTY_CELL, i8::from))
                    .collect()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<Vec<Vec<i8>>> for Board {
    type Error = BoardDecodeError;

    fn try_from(rows: Vec<Vec<i8>>) -> Result<Self, Self::Error> {
        Board::from_wire(&rows)
    }
}

impl From<Board> for Vec<Vec<i8>> {
    fn from(board: Board) -> Self {
        board.to_wire()
    }
}
