use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::{InvalidOrientation, InvalidOrientationTable};

pub const NUM_ORIENTATIONS: u8 = 8;

/// A linear map on `(row, col)` offsets:
/// `(r, c) -> (m[0][0] * r + m[0][1] * c, m[1][0] * r + m[1][1] * c)`.
pub type Matrix = [[i8; 2]; 2];

/// The transform of every orientation id.
///
/// Ids 0 to 3 rotate the shape counterclockwise by 0°, 90°, 180° and 270°.
/// Ids 4 to 7 are the same four rotations of the shape mirrored left-to-right.
pub static ORIENTATION_MATRICES: [Matrix; NUM_ORIENTATIONS as usize] = [
    [[1, 0], [0, 1]],   // (r, c)
    [[0, -1], [1, 0]],  // (-c, r)
    [[-1, 0], [0, -1]], // (-r, -c)
    [[0, 1], [-1, 0]],  // (c, -r)
    [[1, 0], [0, -1]],  // (r, -c)
    [[0, 1], [1, 0]],   // (c, r)
    [[-1, 0], [0, 1]],  // (-r, c)
    [[0, -1], [-1, 0]], // (-c, -r)
];

/// `table[k1][k2]` is the orientation equivalent to applying `k1`, then `k2`.
pub type CompositionTable = [[Orientation; NUM_ORIENTATIONS as usize]; NUM_ORIENTATIONS as usize];

static COMPOSITION: LazyLock<CompositionTable> = LazyLock::new(|| {
    composition_table(&ORIENTATION_MATRICES)
        .expect("ORIENTATION_MATRICES must be closed under composition")
});

/// One of the eight symmetries of the square, applied to the offsets of a piece.
///
/// This is not a property of a [`Piece`](crate::Piece), but of a piece as it
/// is held in a hand or placed on the board. Serializes as its id in `0..8`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Orientation(u8);

impl Orientation {
    pub const IDENTITY: Orientation = Orientation(0);
    const QUARTER_TURN_COUNTERCLOCKWISE: Orientation = Orientation(1);
    const QUARTER_TURN_CLOCKWISE: Orientation = Orientation(3);
    const MIRROR_COLUMNS: Orientation = Orientation(4);
    const MIRROR_ROWS: Orientation = Orientation(6);

    /// All orientations, in id order.
    pub fn all() -> impl Iterator<Item = Orientation> {
        (0..NUM_ORIENTATIONS).map(Orientation)
    }

    pub fn id(self) -> u8 {
        self.0
    }

    /// Whether the shape is mirrored, i.e. the id is in `4..8`.
    pub fn is_mirrored(self) -> bool {
        self.0 >= 4
    }

    pub fn matrix(self) -> Matrix {
        ORIENTATION_MATRICES[self.0 as usize]
    }

    /// Transforms an offset relative to the pivot.
    pub fn apply(self, offset: (i8, i8)) -> (i8, i8) {
        transform(self.matrix(), offset)
    }

    /// The orientation equivalent to applying `self`, then `next`.
    ///
    /// ```
    /// # use blokus::Orientation;
    /// let k1 = Orientation::try_from(1).unwrap();
    /// let k2 = Orientation::try_from(4).unwrap();
    /// assert_eq!(k2.apply(k1.apply((1, 2))), k1.then(k2).apply((1, 2)));
    /// ```
    pub fn then(self, next: Orientation) -> Orientation {
        COMPOSITION[self.0 as usize][next.0 as usize]
    }

    /// Mirrors the oriented shape left-to-right. Pairs 0-4, 1-7, 2-6, 3-5.
    #[must_use]
    pub fn flip_horizontal(self) -> Orientation {
        self.then(Self::MIRROR_COLUMNS)
    }

    /// Mirrors the oriented shape top-to-bottom. Pairs 0-6, 1-5, 2-4, 3-7.
    #[must_use]
    pub fn flip_vertical(self) -> Orientation {
        self.then(Self::MIRROR_ROWS)
    }

    /// Successor within the same reflection parity: 0→1→2→3→0 and 4→5→6→7→4.
    #[must_use]
    pub fn rotate_counterclockwise(self) -> Orientation {
        self.then(Self::QUARTER_TURN_COUNTERCLOCKWISE)
    }

    /// Predecessor within the same reflection parity.
    #[must_use]
    pub fn rotate_clockwise(self) -> Orientation {
        self.then(Self::QUARTER_TURN_CLOCKWISE)
    }
}

impl TryFrom<u8> for Orientation {
    type Error = InvalidOrientation;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        if id < NUM_ORIENTATIONS {
            Ok(Orientation(id))
        } else {
            Err(InvalidOrientation(id))
        }
    }
}

impl From<Orientation> for u8 {
    fn from(orientation: Orientation) -> u8 {
        orientation.0
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transforms `offset` by the orientation with the raw id `orientation`.
pub fn apply_orientation(offset: (i8, i8), orientation: u8) -> Result<(i8, i8), InvalidOrientation> {
    Orientation::try_from(orientation).map(|o| o.apply(offset))
}

/// A change the player can make to the orientation of a piece in their hand.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OrientationChange {
    FlipHorizontal,
    FlipVertical,
    RotateClockwise,
    RotateCounterclockwise,
}

impl OrientationChange {
    pub fn apply(self, orientation: Orientation) -> Orientation {
        match self {
            OrientationChange::FlipHorizontal => orientation.flip_horizontal(),
            OrientationChange::FlipVertical => orientation.flip_vertical(),
            OrientationChange::RotateClockwise => orientation.rotate_clockwise(),
            OrientationChange::RotateCounterclockwise => orientation.rotate_counterclockwise(),
        }
    }
}

fn transform(m: Matrix, (row, col): (i8, i8)) -> (i8, i8) {
    (m[0][0] * row + m[0][1] * col, m[1][0] * row + m[1][1] * col)
}

/// `a · b`, i.e. the map that applies `b` first.
fn compose_matrices(a: Matrix, b: Matrix) -> Matrix {
    let mut out = [[0; 2]; 2];
    for (i, out_row) in out.iter_mut().enumerate() {
        for (j, out_cell) in out_row.iter_mut().enumerate() {
            *out_cell = a[i][0] * b[0][j] + a[i][1] * b[1][j];
        }
    }
    out
}

/// Derives the composition table of a set of transforms, checking that the
/// transforms are distinct and that composing any two of them gives another one.
pub fn composition_table(
    matrices: &[Matrix; NUM_ORIENTATIONS as usize],
) -> Result<CompositionTable, InvalidOrientationTable> {
    for (first, a) in matrices.iter().enumerate() {
        if let Some(second) = matrices[first + 1..].iter().position(|b| a == b) {
            return Err(InvalidOrientationTable::DuplicateEntry {
                first: first as u8,
                second: (first + 1 + second) as u8,
            });
        }
    }

    let mut table = [[Orientation::IDENTITY; NUM_ORIENTATIONS as usize]; NUM_ORIENTATIONS as usize];
    for (first, &m1) in matrices.iter().enumerate() {
        for (then, &m2) in matrices.iter().enumerate() {
            let product = compose_matrices(m2, m1);
            let id = matrices.iter().position(|&m| m == product).ok_or(
                InvalidOrientationTable::NotClosed {
                    first: first as u8,
                    then: then as u8,
                },
            )?;
            table[first][then] = Orientation(id as u8);
        }
    }
    Ok(table)
}

/// Checks [`ORIENTATION_MATRICES`] for group closure.
pub fn validate_orientation_table() -> Result<(), InvalidOrientationTable> {
    composition_table(&ORIENTATION_MATRICES).map(|_| ())
}
