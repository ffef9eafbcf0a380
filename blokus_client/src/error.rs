use blokus::PieceId;

#[derive(Debug)]
/// Error type for requests made through a [`Session`](crate::Session).
pub enum SessionError {
    /// No game has been started with [`Session::start`](crate::Session::start).
    NotStarted,
    /// A move was attempted before the server answered the previous one.
    MovePending { piece_id: PieceId },
    NoPieceSelected,
    /// The connection to the server is gone.
    Closed,
    Encode(serde_json::Error),
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NotStarted => write!(f, "No game has been started"),
            SessionError::MovePending { piece_id } => write!(
                f,
                "Still waiting for the server to answer the move with piece {}",
                piece_id
            ),
            SessionError::NoPieceSelected => write!(f, "No piece is selected"),
            SessionError::Closed => write!(f, "The connection to the server is closed"),
            SessionError::Encode(_) => write!(f, "Message could not be encoded"),
        }
    }
}
