use serde::{Deserialize, Serialize};

use crate::{Board, DecodeError, Orientation, PieceId, PlayerColor};

/// The discriminator field of every message, in both directions.
pub const MESSAGE_TAG: &str = "message";

/// The discriminators of all [`ServerMessage`] variants.
const SERVER_MESSAGE_TAGS: [&str; 2] = ["opponentMove", "playerMoveResponse"];

/// Message from the client to the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message")]
pub enum ClientMessage {
    /// Start a game against the server's AI, playing as `color`.
    #[serde(rename = "startAIGame")]
    StartAiGame { color: PlayerColor },
    /// Place a piece.
    ///
    /// The server answers with a [`ServerMessage::PlayerMoveResponse`].
    #[serde(rename = "attemptMove", rename_all = "camelCase")]
    AttemptMove {
        piece_id: PieceId,
        orientation: Orientation,
        /// The `[row, col]` cell the pivot of the piece is placed on.
        position: (i8, i8),
    },
}

/// Message from the server to the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message")]
pub enum ServerMessage {
    /// The opponent has placed a piece.
    #[serde(rename = "opponentMove", rename_all = "camelCase")]
    OpponentMove {
        piece_id: PieceId,
        /// The board after the move.
        board: Board,
        /// The players who won or tied. Empty while the game continues.
        winners: Vec<PlayerColor>,
        /// By how many players the turn advances.
        turn_increment: i32,
    },
    /// The answer to a [`ClientMessage::AttemptMove`].
    ///
    /// If the move was rejected, the other fields repeat the current state
    /// and carry no information.
    #[serde(rename = "playerMoveResponse", rename_all = "camelCase")]
    PlayerMoveResponse {
        is_move_valid: bool,
        piece_id: PieceId,
        board: Board,
        winners: Vec<PlayerColor>,
        turn_increment: i32,
    },
}

impl ServerMessage {
    pub fn piece_id(&self) -> PieceId {
        match self {
            ServerMessage::OpponentMove { piece_id, .. }
            | ServerMessage::PlayerMoveResponse { piece_id, .. } => *piece_id,
        }
    }
}

/// Decodes a message from the server.
///
/// Returns `Ok(None)` for messages with a discriminator this client does not
/// know about, so that newer servers can add message types.
pub fn decode_server_message(text: &str) -> Result<Option<ServerMessage>, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let is_known = match value.get(MESSAGE_TAG).and_then(serde_json::Value::as_str) {
        Some(tag) => SERVER_MESSAGE_TAGS.contains(&tag),
        None => return Err(DecodeError::MissingDiscriminator),
    };
    if !is_known {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

/// Encodes a message for the server.
pub fn encode_client_message(message: &ClientMessage) -> serde_json::Result<String> {
    serde_json::to_string(message)
}
