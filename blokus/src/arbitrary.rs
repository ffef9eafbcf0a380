use crate::{Board, Orientation, PlayerColor};

/// An offset small enough that no orientation can overflow it.
#[derive(Clone, Copy, Debug)]
pub struct SmallOffset(pub (i8, i8));

impl quickcheck::Arbitrary for SmallOffset {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let i = (u8::arbitrary(g) % 21) as i8 - 10;
        let j = (u8::arbitrary(g) % 21) as i8 - 10;
        SmallOffset((i, j))
    }
}

impl quickcheck::Arbitrary for Orientation {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&Orientation::all().collect::<Vec<_>>()).unwrap()
    }
}

impl quickcheck::Arbitrary for PlayerColor {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&PlayerColor::ALL).unwrap()
    }
}

impl quickcheck::Arbitrary for Board {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let width = (u8::arbitrary(g) % 14) as usize + 1;
        let height = (u8::arbitrary(g) % 14) as usize + 1;
        let mut board = Board::with_size(width, height);
        for row in 0..height as i8 {
            for col in 0..width as i8 {
                let cell = *g
                    .choose(&[None, Some(PlayerColor::First), Some(PlayerColor::Second)])
                    .unwrap();
                if cell.is_some() {
                    board = board.with_cell(row, col, cell);
                }
            }
        }
        board
    }
}
