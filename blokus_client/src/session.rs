use std::sync::{Arc, Mutex, PoisonError};

use blokus::{
    decode_server_message, encode_client_message, Catalog, ClientMessage, GameState, Orientation,
    OrientationChange, PieceId, PlayerColor, ServerMessage,
};
use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, trace, warn};

use crate::{transport, SessionError, Store};

/// Something that happened on the connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The websocket handshake completed.
    Opened,
    /// A server message changed the game state.
    StateUpdated(GameState),
    /// The server refused the move with this piece. The state is unchanged.
    MoveRejected { piece_id: PieceId },
    /// The connection ended. No more events follow.
    Terminated { reason: Option<String> },
}

/// Applies incoming frames to the store.
struct Dispatcher {
    store: Store,
    catalog: Arc<Catalog>,
    pending_move: Arc<Mutex<Option<PieceId>>>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl Dispatcher {
    fn handle_text(&self, text: &str) {
        trace!(message = %text, "Received message");
        match decode_server_message(text) {
            Ok(Some(message)) => self.handle_message(&message),
            Ok(None) => debug!("Ignoring message of unknown type"),
            Err(err) => warn!(%err, "Dropping malformed message"),
        }
    }

    fn handle_message(&self, message: &ServerMessage) {
        if self.store.snapshot().is_none() {
            warn!(
                piece_id = message.piece_id(),
                "Dropping message received before a game was started"
            );
            return;
        }
        let rejected = matches!(
            message,
            ServerMessage::PlayerMoveResponse {
                is_move_valid: false,
                ..
            }
        );
        if let ServerMessage::PlayerMoveResponse { .. } = message {
            *lock(&self.pending_move) = None;
        }

        if let Some(state) = self.store.update(|prev| prev.apply(&self.catalog, message)) {
            debug!(
                turn = %state.turn,
                my_score = state.score_of(state.color),
                opponent_score = state.score_of(state.color.opponent()),
                "Game state updated"
            );
            let _ = self.events.send(SessionEvent::StateUpdated(state));
        }
        if rejected {
            info!(piece_id = message.piece_id(), "Move rejected by the server");
            let _ = self.events.send(SessionEvent::MoveRejected {
                piece_id: message.piece_id(),
            });
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A connection to a game server, and the state of the game played on it.
///
/// All state changes go through the [`Store`]. Server messages are applied
/// by a background task in the order they arrive.
pub struct Session {
    store: Store,
    catalog: Arc<Catalog>,
    pending_move: Arc<Mutex<Option<PieceId>>>,
    outbound: mpsc::UnboundedSender<Message>,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

impl Session {
    /// Connects to the server at `url`.
    ///
    /// Returns the session together with the stream of its events. The first
    /// event is always [`SessionEvent::Opened`].
    pub async fn connect(
        url: &str,
        catalog: Arc<Catalog>,
    ) -> anyhow::Result<(Session, mpsc::UnboundedReceiver<SessionEvent>)> {
        Self::connect_with_open(url, catalog, || {}).await
    }

    /// Like [`Session::connect`], calling `on_open` once the handshake completed.
    pub async fn connect_with_open(
        url: &str,
        catalog: Arc<Catalog>,
        on_open: impl FnOnce(),
    ) -> anyhow::Result<(Session, mpsc::UnboundedReceiver<SessionEvent>)> {
        let ws = transport::open(url).await?;
        info!(%url, "Connected");
        on_open();

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let _ = events_tx.send(SessionEvent::Opened);

        let (write, read) = ws.split();
        let (outbound, frames) = mpsc::unbounded_channel();
        let writer = tokio::spawn(transport::write_frames(write, frames));

        let store = Store::new();
        let pending_move = Arc::new(Mutex::new(None));
        let dispatcher = Dispatcher {
            store: store.clone(),
            catalog: Arc::clone(&catalog),
            pending_move: Arc::clone(&pending_move),
            events: events_tx,
        };
        let reader = tokio::spawn(async move {
            let reason = transport::read_frames(read, |text| dispatcher.handle_text(text)).await;
            info!(?reason, "Connection closed");
            *lock(&dispatcher.pending_move) = None;
            let _ = dispatcher.events.send(SessionEvent::Terminated { reason });
        });

        let session = Session {
            store,
            catalog,
            pending_move,
            outbound,
            writer,
            reader,
        };
        Ok((session, events_rx))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The current game state, `None` before [`Session::start`].
    pub fn state(&self) -> Option<GameState> {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<GameState>> {
        self.store.subscribe()
    }

    /// The piece of a move the server hasn't answered yet.
    pub fn pending_move(&self) -> Option<PieceId> {
        *lock(&self.pending_move)
    }

    /// Starts a new game against the server's AI, discarding any current game.
    ///
    /// The new game is stored before the request is sent. If the request
    /// can't be sent, the previous game and pending move are put back.
    pub fn start(&self, color: PlayerColor) -> Result<(), SessionError> {
        let previous = self.store.snapshot();
        self.store.replace(GameState::new(&self.catalog, color));
        let pending = lock(&self.pending_move).take();
        info!(%color, "Starting game");
        if let Err(err) = self.send(&ClientMessage::StartAiGame { color }) {
            self.store.restore(previous);
            *lock(&self.pending_move) = pending;
            return Err(err);
        }
        Ok(())
    }

    /// Asks the server to place a piece with its pivot at `position`.
    ///
    /// Only one move can be in flight. The state changes once the server
    /// confirmed the move.
    pub fn attempt_move(
        &self,
        piece_id: PieceId,
        orientation: Orientation,
        position: (i8, i8),
    ) -> Result<(), SessionError> {
        if self.store.snapshot().is_none() {
            return Err(SessionError::NotStarted);
        }
        {
            let mut pending = lock(&self.pending_move);
            if let Some(piece_id) = *pending {
                return Err(SessionError::MovePending { piece_id });
            }
            *pending = Some(piece_id);
        }
        debug!(piece_id, %orientation, ?position, "Attempting move");
        let result = self.send(&ClientMessage::AttemptMove {
            piece_id,
            orientation,
            position,
        });
        if result.is_err() {
            *lock(&self.pending_move) = None;
        }
        result
    }

    /// Attempts to place the selected piece, as it is turned in the hand.
    pub fn attempt_selected_move(&self, position: (i8, i8)) -> Result<(), SessionError> {
        let state = self.store.snapshot().ok_or(SessionError::NotStarted)?;
        let piece = state
            .selected_oriented_piece()
            .ok_or(SessionError::NoPieceSelected)?;
        self.attempt_move(piece.piece_id, piece.orientation, position)
    }

    pub fn select_piece(&self, piece_id: Option<PieceId>) -> Result<(), SessionError> {
        self.store.snapshot().ok_or(SessionError::NotStarted)?;
        self.store.update(|state| state.with_selected_piece(piece_id));
        Ok(())
    }

    pub fn change_orientation(
        &self,
        piece_id: PieceId,
        change: OrientationChange,
    ) -> Result<(), SessionError> {
        self.store.snapshot().ok_or(SessionError::NotStarted)?;
        self.store
            .update(|state| state.with_orientation_change(piece_id, change));
        Ok(())
    }

    /// Closes the connection. Waits until the close frame was sent.
    pub async fn close(mut self) {
        if self.outbound.send(Message::Close(None)).is_ok() {
            let _ = (&mut self.writer).await;
        }
        info!("Session closed");
    }

    fn send(&self, message: &ClientMessage) -> Result<(), SessionError> {
        let text = encode_client_message(message).map_err(SessionError::Encode)?;
        trace!(message = %text, "Sending message");
        self.outbound
            .send(Message::Text(text.into()))
            .map_err(|_| SessionError::Closed)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

#[cfg(test)]
mod tests {
    use blokus::{Board, PIECES};

    use super::*;

    fn dispatcher() -> (Dispatcher, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher {
            store: Store::new(),
            catalog: Arc::new(PIECES.clone()),
            pending_move: Arc::new(Mutex::new(None)),
            events,
        };
        (dispatcher, rx)
    }

    fn opponent_move(piece_id: PieceId) -> String {
        let board = Board::empty().with_cell(4, 4, Some(PlayerColor::First));
        serde_json::to_string(&ServerMessage::OpponentMove {
            piece_id,
            board,
            winners: vec![],
            turn_increment: 1,
        })
        .unwrap()
    }

    #[test]
    fn messages_before_start_are_dropped() {
        let (dispatcher, mut rx) = dispatcher();
        dispatcher.handle_text(&opponent_move(0));
        assert!(dispatcher.store.snapshot().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn malformed_and_unknown_messages_are_dropped() {
        let (dispatcher, mut rx) = dispatcher();
        let start = GameState::new(&PIECES, PlayerColor::Second);
        dispatcher.store.replace(start.clone());
        dispatcher.handle_text("not json");
        dispatcher.handle_text(r#"{"message":"chat","text":"hi"}"#);
        dispatcher.handle_text(r#"{"message":"opponentMove","pieceId":"zero"}"#);
        assert_eq!(dispatcher.store.snapshot(), Some(start));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn opponent_move_updates_state() {
        let (dispatcher, mut rx) = dispatcher();
        dispatcher
            .store
            .replace(GameState::new(&PIECES, PlayerColor::Second));
        dispatcher.handle_text(&opponent_move(0));

        let state = dispatcher.store.snapshot().unwrap();
        assert_eq!(state.turn, PlayerColor::Second);
        assert!(!state.opponent_pieces_remaining.contains(0));
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::StateUpdated(state));
    }

    #[test]
    fn rejected_move_clears_pending_move() {
        let (dispatcher, mut rx) = dispatcher();
        let start = GameState::new(&PIECES, PlayerColor::First);
        dispatcher.store.replace(start.clone());
        *lock(&dispatcher.pending_move) = Some(5);

        let response = serde_json::to_string(&ServerMessage::PlayerMoveResponse {
            is_move_valid: false,
            piece_id: 5,
            board: Board::empty(),
            winners: vec![],
            turn_increment: 0,
        })
        .unwrap();
        dispatcher.handle_text(&response);

        assert_eq!(*lock(&dispatcher.pending_move), None);
        assert_eq!(dispatcher.store.snapshot(), Some(start));
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::MoveRejected { piece_id: 5 }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn failed_start_keeps_the_previous_game() {
        let (outbound, frames) = mpsc::unbounded_channel();
        drop(frames);
        let session = Session {
            store: Store::new(),
            catalog: Arc::new(PIECES.clone()),
            pending_move: Arc::new(Mutex::new(None)),
            outbound,
            writer: tokio::spawn(async {}),
            reader: tokio::spawn(async {}),
        };

        assert!(matches!(
            session.start(PlayerColor::First),
            Err(SessionError::Closed)
        ));
        assert_eq!(session.state(), None);

        let game = GameState::new(&PIECES, PlayerColor::Second).with_selected_piece(Some(4));
        session.store.replace(game.clone());
        *lock(&session.pending_move) = Some(4);
        assert!(matches!(
            session.start(PlayerColor::First),
            Err(SessionError::Closed)
        ));
        assert_eq!(session.state(), Some(game));
        assert_eq!(session.pending_move(), Some(4));
    }
}
