use std::str::FromStr;
use std::sync::LazyLock;

use crate::{MalformedPiece, Orientation};

/// Index of a piece in its [`Catalog`].
///
/// This is also the identifier of the piece in messages exchanged with the
/// server, so the order of the catalog must match the server's.
pub type PieceId = usize;

/// The notation of the 21 standard pieces, in the order the server numbers them.
///
/// `C` is the pivot cell and `X` any other cell of the piece. Pieces are
/// separated by blank lines.
pub static PIECES_NOTATION: &str = r"C

CX

XC
 X

XCX

CX
XX

 X
XCX

XCXX

  X
XCX

 CX
XX

X
XCXX

 X
 X
XCX

X
X
CXX

 CXX
XX

  X
XCX
X

XXCXX

X
CX
XX

 XX
XC
X

XX
C
XX

 XX
XC
 X

 X
XCX
 X

 X
XCXX";

/// The standard piece set.
pub static PIECES: LazyLock<Catalog> = LazyLock::new(|| {
    Catalog::parse(PIECES_NOTATION).expect("PIECES_NOTATION must be well-formed")
});

/// The shape of a polyomino, as offsets of its cells from the pivot cell.
///
/// The pivot itself is at `(0, 0)` and is not part of the offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    offsets: Vec<(i8, i8)>,
}

impl Piece {
    pub fn new(offsets: Vec<(i8, i8)>) -> Self {
        debug_assert!(!offsets.contains(&(0, 0)));
        Self { offsets }
    }

    /// The `(row, col)` offsets of the non-pivot cells, in row-major order of the notation.
    pub fn offsets(&self) -> &[(i8, i8)] {
        &self.offsets
    }

    /// Number of cells covered by the piece, including the pivot.
    pub fn num_cells(&self) -> usize {
        self.offsets.len() + 1
    }

    /// The board cells covered when the piece is placed with `orientation`
    /// and its pivot on `pivot`. The pivot comes first.
    pub fn cells(
        &self,
        orientation: Orientation,
        pivot: (i8, i8),
    ) -> impl Iterator<Item = (i8, i8)> + '_ {
        std::iter::once((0, 0))
            .chain(self.offsets.iter().map(move |&offset| orientation.apply(offset)))
            .map(move |(di, dj)| (pivot.0 + di, pivot.1 + dj))
    }
}

/// A fixed, ordered list of pieces. The position of a piece is its [`PieceId`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    pieces: Vec<Piece>,
    initial_score: i32,
}

impl Catalog {
    /// Parses the piece notation, see [`PIECES_NOTATION`].
    ///
    /// Blank lines (empty or whitespace only) separate pieces; several blank
    /// lines in a row count as one separator.
    pub fn parse(text: &str) -> Result<Self, MalformedPiece> {
        let mut definitions: Vec<Vec<&str>> = Vec::new();
        let mut current = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    definitions.push(std::mem::take(&mut current));
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            definitions.push(current);
        }

        let pieces = definitions
            .iter()
            .enumerate()
            .map(|(piece_idx, lines)| parse_piece(piece_idx, lines))
            .collect::<Result<Vec<Piece>, MalformedPiece>>()?;
        Ok(Self::new(pieces))
    }

    pub fn new(pieces: Vec<Piece>) -> Self {
        let initial_score = -pieces.iter().map(|p| p.num_cells() as i32).sum::<i32>();
        Self {
            pieces,
            initial_score,
        }
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn get(&self, piece_id: PieceId) -> Option<&Piece> {
        self.pieces.get(piece_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Piece> {
        self.pieces.iter()
    }

    /// The score of a player who has not placed any piece yet.
    pub fn initial_score(&self) -> i32 {
        self.initial_score
    }
}

impl FromStr for Catalog {
    type Err = MalformedPiece;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Catalog::parse(s)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Piece;
    type IntoIter = std::slice::Iter<'a, Piece>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn parse_piece(piece_idx: usize, lines: &[&str]) -> Result<Piece, MalformedPiece> {
    let mut pivots = Vec::new();
    let mut cells = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        for (j, c) in line.chars().enumerate() {
            match c {
                'C' => pivots.push((i, j)),
                'X' => cells.push((i, j)),
                _ => {}
            }
        }
    }
    let (pivot_i, pivot_j) = match pivots.as_slice() {
        [pivot] => *pivot,
        [] => return Err(MalformedPiece::MissingPivot { piece_idx }),
        _ => {
            return Err(MalformedPiece::MultiplePivots {
                piece_idx,
                num_pivots: pivots.len(),
            })
        }
    };
    let offsets = cells
        .into_iter()
        .map(|(i, j)| Some((offset(i, pivot_i)?, offset(j, pivot_j)?)))
        .collect::<Option<Vec<_>>>()
        .ok_or(MalformedPiece::TooLarge { piece_idx })?;
    Ok(Piece::new(offsets))
}

/// The distance from `pivot` to `index`, if every orientation can turn it
/// without overflow. `i8::MIN` can't be negated, so it is excluded.
fn offset(index: usize, pivot: usize) -> Option<i8> {
    let distance = i64::try_from(index).ok()? - i64::try_from(pivot).ok()?;
    i8::try_from(distance).ok().filter(|&d| d != i8::MIN)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn pivot_only_and_domino() {
        let catalog = Catalog::parse("C\n\nCX").unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(0).unwrap().offsets().is_empty());
        assert_eq!(catalog.get(0).unwrap().num_cells(), 1);
        assert_eq!(catalog.get(1).unwrap().offsets().to_vec(), vec![(0, 1)]);
        assert_eq!(catalog.initial_score(), -3);
    }

    #[test]
    fn standard_pieces() {
        assert_eq!(PIECES.len(), 21);
        assert_eq!(PIECES.initial_score(), -89);
        assert_eq!(PIECES.get(2).unwrap().offsets().to_vec(), vec![(0, -1), (1, 0)]);
        assert_eq!(
            PIECES.get(14).unwrap().offsets().to_vec(),
            vec![(0, -2), (0, -1), (0, 1), (0, 2)]
        );
        let num_cells: Vec<usize> = PIECES.iter().map(Piece::num_cells).collect();
        assert_eq!(&num_cells[..4], &[1, 2, 3, 3]);
        assert!(num_cells[4..9].iter().all(|&n| n == 4));
        assert!(num_cells[9..].iter().all(|&n| n == 5));
    }

    #[test]
    fn malformed_pieces() {
        assert_eq!(
            Catalog::parse("C\n\nXX"),
            Err(MalformedPiece::MissingPivot { piece_idx: 1 })
        );
        assert_eq!(
            Catalog::parse("CX\nXC\n\nC"),
            Err(MalformedPiece::MultiplePivots {
                piece_idx: 0,
                num_pivots: 2
            })
        );
    }

    #[test]
    fn oversized_pieces() {
        let wide = format!("C{}X", " ".repeat(199));
        assert_eq!(
            Catalog::parse(&format!("C\n\n{}", wide)),
            Err(MalformedPiece::TooLarge { piece_idx: 1 })
        );
        // -128 would overflow when mirrored
        let left = format!("X{}C", " ".repeat(127));
        assert_eq!(
            Catalog::parse(&left),
            Err(MalformedPiece::TooLarge { piece_idx: 0 })
        );
        let tall = format!("C{}\nX", "\n.".repeat(126));
        let catalog = Catalog::parse(&tall).unwrap();
        let piece = catalog.get(0).unwrap();
        assert_eq!(piece.offsets().to_vec(), vec![(127, 0)]);
        for orientation in Orientation::all() {
            assert_eq!(piece.cells(orientation, (0, 0)).count(), 2);
        }
    }

    #[test]
    fn separators() {
        let catalog = Catalog::parse("\n\nC\r\n  \r\n\r\nXC\n X\n\n").unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().offsets().to_vec(), vec![(0, -1), (1, 0)]);
        assert_eq!("".parse::<Catalog>().unwrap().len(), 0);
    }

    #[test]
    fn placed_cells() {
        let piece = PIECES.get(2).unwrap();
        let rotated = Orientation::try_from(1).unwrap();
        let cells: Vec<(i8, i8)> = piece.cells(rotated, (5, 5)).collect();
        assert_eq!(cells, vec![(5, 5), (6, 5), (5, 6)]);
    }

    /// Piece 18 drawn by hand in each of the eight orientations.
    const PIECE_18_ORIENTATIONS: &str = concat!(
        " XX\n", "XC\n", " X\n", "\n",
        "X\n", "XCX\n", " X\n", "\n",
        " X\n", " CX\n", "XX\n", "\n",
        " X\n", "XCX\n", "  X\n", "\n",
        "XX\n", " CX\n", " X\n", "\n",
        " X\n", "XCX\n", "X\n", "\n",
        " X\n", "XC\n", " XX\n", "\n",
        "  X\n", "XCX\n", " X",
    );

    #[test]
    fn orientations_match_drawings() {
        let drawings = Catalog::parse(PIECE_18_ORIENTATIONS).unwrap();
        assert_eq!(drawings.len(), 8);
        let piece = PIECES.get(18).unwrap();
        for (orientation, drawing) in Orientation::all().zip(drawings.iter()) {
            let rotated: BTreeSet<(i8, i8)> =
                piece.offsets().iter().map(|&o| orientation.apply(o)).collect();
            let expected: BTreeSet<(i8, i8)> = drawing.offsets().iter().copied().collect();
            assert_eq!(rotated, expected, "orientation {}", orientation);
        }
    }
}
