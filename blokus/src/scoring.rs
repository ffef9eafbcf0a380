use crate::{Catalog, Inventory};

/// The score of a player who has placed all of their pieces.
pub const ALL_PIECES_PLACED_BONUS: i32 = 15;

/// The score of a player holding `inventory`.
///
/// Every unplaced piece costs one point per cell, including the pivot.
/// Placing every piece is rewarded with [`ALL_PIECES_PLACED_BONUS`] instead.
pub fn score(catalog: &Catalog, inventory: &Inventory) -> i32 {
    if inventory.is_empty() {
        return ALL_PIECES_PLACED_BONUS;
    }
    -inventory
        .iter()
        .filter_map(|p| catalog.get(p.piece_id))
        .map(|piece| piece.num_cells() as i32)
        .sum::<i32>()
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::{OrientationChange, PIECES};

    quickcheck! {
        fn placing_a_piece_never_lowers_the_score(piece_ids: Vec<u8>) -> bool {
            let mut inventory = Inventory::full(&PIECES);
            for piece_id in piece_ids {
                let next = inventory.without(piece_id as usize % PIECES.len());
                if score(&PIECES, &next) < score(&PIECES, &inventory) {
                    return false;
                }
                inventory = next;
            }
            true
        }
    }

    #[test]
    fn empty_inventory_gets_bonus() {
        assert_eq!(score(&PIECES, &Inventory::default()), 15);
    }

    #[test]
    fn full_inventory_matches_initial_score() {
        let inventory = Inventory::full(&PIECES);
        assert_eq!(score(&PIECES, &inventory), PIECES.initial_score());
        assert_eq!(score(&PIECES, &inventory), -89);
    }

    #[test]
    fn orientation_does_not_matter() {
        let inventory = Inventory::full(&PIECES)
            .without(20)
            .reoriented(9, OrientationChange::RotateClockwise);
        assert_eq!(score(&PIECES, &inventory), -84);
    }

    #[test]
    fn last_piece() {
        let catalog = Catalog::parse("C\n\nCX").unwrap();
        let inventory = Inventory::full(&catalog).without(0);
        assert_eq!(score(&catalog, &inventory), -2);
        assert_eq!(score(&catalog, &inventory.without(1)), 15);
    }
}
