use serde::{Deserialize, Serialize};

use crate::{Catalog, Orientation, OrientationChange, PieceId};

/// A piece held by a player, together with how they currently have it turned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientedPiece {
    pub piece_id: PieceId,
    pub orientation: Orientation,
}

impl OrientedPiece {
    pub fn new(piece_id: PieceId) -> Self {
        Self {
            piece_id,
            orientation: Orientation::IDENTITY,
        }
    }

    /// The board cells this piece would cover with its pivot on `pivot`.
    ///
    /// Empty if the piece is not in the catalog.
    pub fn cells(&self, catalog: &Catalog, pivot: (i8, i8)) -> Vec<(i8, i8)> {
        catalog
            .get(self.piece_id)
            .map(|piece| piece.cells(self.orientation, pivot).collect())
            .unwrap_or_default()
    }
}

/// The pieces a player has not placed yet, in catalog order.
///
/// There is at most one entry per [`PieceId`]. Pieces are only ever removed.
///
/// # Note on immutability
///
/// This is an immutable type, so its "mutating" methods return a new value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    pieces: Vec<OrientedPiece>,
}

impl Inventory {
    /// Every piece of the catalog, unturned.
    pub fn full(catalog: &Catalog) -> Self {
        Self {
            pieces: (0..catalog.len()).map(OrientedPiece::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn contains(&self, piece_id: PieceId) -> bool {
        self.get(piece_id).is_some()
    }

    pub fn get(&self, piece_id: PieceId) -> Option<OrientedPiece> {
        self.pieces.iter().find(|p| p.piece_id == piece_id).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrientedPiece> {
        self.pieces.iter()
    }

    /// The inventory without `piece_id`. Unchanged if the piece is not in it.
    #[must_use] // Because users might expect this to be a mutating method
    pub fn without(&self, piece_id: PieceId) -> Self {
        Self {
            pieces: self
                .pieces
                .iter()
                .filter(|p| p.piece_id != piece_id)
                .copied()
                .collect(),
        }
    }

    /// The inventory with the orientation of `piece_id` changed.
    #[must_use] // Because users might expect this to be a mutating method
    pub fn reoriented(&self, piece_id: PieceId, change: OrientationChange) -> Self {
        Self {
            pieces: self
                .pieces
                .iter()
                .map(|&p| {
                    if p.piece_id == piece_id {
                        OrientedPiece {
                            piece_id,
                            orientation: change.apply(p.orientation),
                        }
                    } else {
                        p
                    }
                })
                .collect(),
        }
    }
}

impl FromIterator<OrientedPiece> for Inventory {
    /// Later duplicates of a piece id are dropped.
    fn from_iter<T: IntoIterator<Item = OrientedPiece>>(iter: T) -> Self {
        let mut pieces: Vec<OrientedPiece> = Vec::new();
        for piece in iter {
            if !pieces.iter().any(|p| p.piece_id == piece.piece_id) {
                pieces.push(piece);
            }
        }
        Self { pieces }
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a OrientedPiece;
    type IntoIter = std::slice::Iter<'a, OrientedPiece>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PIECES;

    #[test]
    fn full_inventory() {
        let inventory = Inventory::full(&PIECES);
        assert_eq!(inventory.len(), 21);
        assert!(inventory
            .iter()
            .enumerate()
            .all(|(idx, p)| p.piece_id == idx && p.orientation == Orientation::IDENTITY));
    }

    #[test]
    fn without_only_removes_the_piece() {
        let inventory = Inventory::full(&PIECES);
        let pruned = inventory.without(3);
        assert_eq!(pruned.len(), 20);
        assert!(!pruned.contains(3));
        assert!(pruned.contains(4));
        // Removing again, or removing an unknown piece, is a no-op
        assert_eq!(pruned.without(3), pruned);
        assert_eq!(pruned.without(99), pruned);
    }

    #[test]
    fn reoriented_only_turns_the_piece() {
        let inventory = Inventory::full(&PIECES).reoriented(5, OrientationChange::FlipVertical);
        assert_eq!(inventory.get(5).unwrap().orientation.id(), 6);
        assert_eq!(inventory.get(4).unwrap().orientation, Orientation::IDENTITY);
    }

    #[test]
    fn unique_by_piece_id() {
        let inventory: Inventory = [OrientedPiece::new(1), OrientedPiece::new(2), OrientedPiece::new(1)]
            .into_iter()
            .collect();
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn oriented_cells() {
        let piece = OrientedPiece {
            piece_id: 1,
            orientation: Orientation::try_from(2).unwrap(),
        };
        assert_eq!(piece.cells(&PIECES, (3, 3)), vec![(3, 3), (3, 2)]);
        assert!(OrientedPiece::new(42).cells(&PIECES, (3, 3)).is_empty());
    }
}
