/// The error type for [`Catalog::parse()`](crate::Catalog::parse).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MalformedPiece {
    MissingPivot { piece_idx: usize },
    MultiplePivots { piece_idx: usize, num_pivots: usize },
    /// A cell is more than 127 rows or columns away from the pivot.
    TooLarge { piece_idx: usize },
}

impl std::error::Error for MalformedPiece {}

impl std::fmt::Display for MalformedPiece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedPiece::MissingPivot { piece_idx } =>
                write!(f, "Piece {} has no pivot cell 'C'", piece_idx),
            MalformedPiece::MultiplePivots { piece_idx, num_pivots } =>
                write!(f, "Piece {} has {} pivot cells 'C', expected exactly one", piece_idx, num_pivots),
            MalformedPiece::TooLarge { piece_idx } =>
                write!(f, "Piece {} has a cell more than 127 rows or columns away from its pivot", piece_idx),
        }
    }
}

/// An orientation id outside of `0..8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidOrientation(pub u8);

impl std::error::Error for InvalidOrientation {}

impl std::fmt::Display for InvalidOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Orientation {} is not in the range 0..8", self.0)
    }
}

/// The error type for [`validate_orientation_table()`](crate::validate_orientation_table).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidOrientationTable {
    /// Two orientation ids map to the same transform.
    DuplicateEntry { first: u8, second: u8 },
    /// Applying `first`, then `then` gives a transform that is not in the table.
    NotClosed { first: u8, then: u8 },
}

impl std::error::Error for InvalidOrientationTable {}

impl std::fmt::Display for InvalidOrientationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidOrientationTable::DuplicateEntry { first, second } =>
                write!(f, "Orientations {} and {} are the same transform", first, second),
            InvalidOrientationTable::NotClosed { first, then } =>
                write!(f, "Orientation {} followed by {} is not an orientation", first, then),
        }
    }
}

/// A player index that is neither 0 nor 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidPlayerColor(pub i8);

impl std::error::Error for InvalidPlayerColor {}

impl std::fmt::Display for InvalidPlayerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is not a player index, expected 0 or 1", self.0)
    }
}

/// The error type for decoding a [`Board`](crate::Board) from its wire encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardDecodeError {
    Empty,
    NotRectangular { row: usize, len: usize, expected: usize },
    InvalidCell { row: usize, col: usize, value: i8 },
    /// More rows or columns than [`MAX_BOARD_SIDE`](crate::MAX_BOARD_SIDE).
    TooLarge { width: usize, height: usize },
}

impl std::error::Error for BoardDecodeError {}

impl std::fmt::Display for BoardDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardDecodeError::Empty => write!(f, "Board has no cells"),
            BoardDecodeError::NotRectangular { row, len, expected } =>
                write!(f, "Board row {} has {} cells, but the first row has {}", row, len, expected),
            BoardDecodeError::InvalidCell { row, col, value } =>
                write!(f, "Board cell ({}, {}) has value {}, expected -1, 0 or 1", row, col, value),
            BoardDecodeError::TooLarge { width, height } =>
                write!(f, "Board of {}x{} cells is larger than {} rows or columns", width, height, crate::MAX_BOARD_SIDE),
        }
    }
}

/// The error type for [`decode_server_message()`](crate::decode_server_message).
#[derive(Debug)]
pub enum DecodeError {
    /// The text is not JSON, or does not match the schema of its message type.
    Json(serde_json::Error),
    /// The object has no string `message` field.
    MissingDiscriminator,
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Json(err) => Some(err),
            DecodeError::MissingDiscriminator => None,
        }
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Json(_) => write!(f, "Message could not be decoded"),
            DecodeError::MissingDiscriminator => {
                write!(f, "Message has no \"message\" discriminator field")
            }
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json(err)
    }
}
