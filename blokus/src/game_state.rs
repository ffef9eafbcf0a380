use crate::{
    score, Board, Catalog, Inventory, OrientationChange, OrientedPiece, PieceId, PlayerColor,
    ServerMessage,
};

/// How the game has ended, from the local player's point of view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
    Tie,
}

/// The local mirror of one game, as seen by the player with `color`.
///
/// Values of this type are never modified in place: every server message
/// and every local action produces a new state derived from the previous one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    /// Whose turn it is.
    pub turn: PlayerColor,
    /// The color of the local player. Fixed for the whole game.
    pub color: PlayerColor,
    pub pieces_remaining: Inventory,
    pub opponent_pieces_remaining: Inventory,
    /// Indexed by [`PlayerColor::index()`].
    pub scores: [i32; 2],
    pub selected_piece: Option<PieceId>,
    /// `None` until the first move has been reconciled.
    pub winners: Option<Vec<PlayerColor>>,
}

impl GameState {
    /// The state at the start of a game, before anyone has moved.
    pub fn new(catalog: &Catalog, color: PlayerColor) -> Self {
        Self {
            board: Board::empty(),
            turn: PlayerColor::First,
            color,
            pieces_remaining: Inventory::full(catalog),
            opponent_pieces_remaining: Inventory::full(catalog),
            scores: [catalog.initial_score(); 2],
            selected_piece: None,
            winners: None,
        }
    }

    /// Folds one message from the server onto this state.
    ///
    /// A rejected move leaves the state untouched; the server is trusted for
    /// the consistency of the new board with the removed piece.
    pub fn apply(&self, catalog: &Catalog, message: &ServerMessage) -> GameState {
        match message {
            ServerMessage::OpponentMove {
                piece_id,
                board,
                winners,
                turn_increment,
            } => {
                let opponent_pieces_remaining = self.opponent_pieces_remaining.without(*piece_id);
                let mut scores = self.scores;
                scores[self.color.opponent().index()] =
                    score(catalog, &opponent_pieces_remaining);
                GameState {
                    board: board.clone(),
                    turn: self.turn.advance(*turn_increment),
                    color: self.color,
                    pieces_remaining: self.pieces_remaining.clone(),
                    opponent_pieces_remaining,
                    scores,
                    selected_piece: self.selected_piece,
                    winners: Some(winners.clone()),
                }
            }
            ServerMessage::PlayerMoveResponse {
                is_move_valid: false,
                ..
            } => self.clone(),
            ServerMessage::PlayerMoveResponse {
                is_move_valid: true,
                piece_id,
                board,
                winners,
                turn_increment,
            } => {
                let pieces_remaining = self.pieces_remaining.without(*piece_id);
                let mut scores = self.scores;
                scores[self.color.index()] = score(catalog, &pieces_remaining);
                GameState {
                    board: board.clone(),
                    turn: self.turn.advance(*turn_increment),
                    color: self.color,
                    pieces_remaining,
                    opponent_pieces_remaining: self.opponent_pieces_remaining.clone(),
                    scores,
                    selected_piece: self.selected_piece.filter(|id| id != piece_id),
                    winners: Some(winners.clone()),
                }
            }
        }
    }

    /// Selects a piece from the hand. Pieces that are not in the hand can't be selected.
    #[must_use]
    pub fn with_selected_piece(&self, piece_id: Option<PieceId>) -> GameState {
        match piece_id {
            Some(id) if !self.pieces_remaining.contains(id) => self.clone(),
            _ => GameState {
                selected_piece: piece_id,
                ..self.clone()
            },
        }
    }

    /// Turns or flips a piece in the hand.
    #[must_use]
    pub fn with_orientation_change(
        &self,
        piece_id: PieceId,
        change: OrientationChange,
    ) -> GameState {
        GameState {
            pieces_remaining: self.pieces_remaining.reoriented(piece_id, change),
            ..self.clone()
        }
    }

    /// The selected piece, as currently turned in the hand.
    pub fn selected_oriented_piece(&self) -> Option<OrientedPiece> {
        self.selected_piece
            .and_then(|id| self.pieces_remaining.get(id))
    }

    pub fn is_my_turn(&self) -> bool {
        self.turn == self.color && !self.is_over()
    }

    pub fn is_over(&self) -> bool {
        self.winners.as_ref().is_some_and(|w| !w.is_empty())
    }

    pub fn outcome(&self) -> Outcome {
        let Some(winners) = self.winners.as_deref().filter(|w| !w.is_empty()) else {
            return Outcome::InProgress;
        };
        if !winners.contains(&self.color) {
            Outcome::Lost
        } else if winners.iter().any(|&color| color != self.color) {
            Outcome::Tie
        } else {
            Outcome::Won
        }
    }

    pub fn score_of(&self, color: PlayerColor) -> i32 {
        self.scores[color.index()]
    }
}
